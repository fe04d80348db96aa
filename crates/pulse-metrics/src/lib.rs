//! Metrics deriver for social post exports.
//!
//! Loads a CSV export, resolves header aliases into a fixed [`ColumnMap`],
//! derives per-post engagement metrics, and summarises a trailing window
//! against configured baselines. Undefined values are `None` throughout and
//! every statistic skips them.

pub mod columns;
pub mod error;
pub mod load;
pub mod normalize;
pub mod record;
pub mod report;
pub mod stats;

pub use columns::{ColumnMap, Field};
pub use error::MetricsError;
pub use load::{load_posts, read_posts, Dataset};
pub use record::PostRecord;
pub use report::{
    derive_report, AggregateWindow, Derivation, DeriverConfig, MetricsReport, RankedPost,
    TerritoryMedian,
};
