use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised before any row is processed.
///
/// Data-quality problems (bad dates, unparseable numbers, missing optional
/// columns) are never errors; they degrade to dropped rows or `None` values.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("input CSV not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// None of the accepted aliases for a mandatory field appear in the header.
    #[error("CSV missing required column {field}: expected one of {}", aliases.join(", "))]
    MissingRequiredColumn {
        field: &'static str,
        aliases: &'static [&'static str],
    },
}
