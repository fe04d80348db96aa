//! Publishes derived metrics to a Notion insights database.
//!
//! Each run writes at most one page per insight type per UTC calendar day:
//! today's page is looked up first and updated in place when it exists.

pub mod client;
pub mod content;
pub mod error;
pub mod publish;
pub mod types;

pub use client::NotionClient;
pub use content::{build_predictive_test, build_weekly_pulse, InsightContent};
pub use error::NotionError;
pub use publish::{publish_report, Outcome, PublishSummary, Publisher};
pub use types::{Confidence, InsightSummary, InsightType, Page, Properties};
