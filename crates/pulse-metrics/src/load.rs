use std::io::Read;
use std::path::Path;

use crate::columns::ColumnMap;
use crate::error::MetricsError;
use crate::record::PostRecord;

/// Normalised contents of one export.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: ColumnMap,
    /// Rows with a valid date, in input order.
    pub posts: Vec<PostRecord>,
    /// Rows dropped because their date did not parse.
    pub dropped_rows: usize,
}

/// Loads and normalises the CSV at `path`.
///
/// # Errors
///
/// - [`MetricsError::InputNotFound`] if `path` does not exist.
/// - [`MetricsError::Io`] if it cannot be opened.
/// - [`MetricsError::MissingRequiredColumn`] if no date column resolves.
/// - [`MetricsError::Csv`] if the header row is unreadable.
pub fn load_posts(path: &Path, fallback_followers: f64) -> Result<Dataset, MetricsError> {
    if !path.exists() {
        return Err(MetricsError::InputNotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|source| MetricsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "reading post export");
    read_posts(file, fallback_followers)
}

/// Reads and normalises CSV content from any reader.
///
/// Rows the CSV parser cannot decode are skipped with a warning rather than
/// aborting the run.
///
/// # Errors
///
/// - [`MetricsError::MissingRequiredColumn`] if no date column resolves.
/// - [`MetricsError::Csv`] if the header row is unreadable.
pub fn read_posts<R: Read>(reader: R, fallback_followers: f64) -> Result<Dataset, MetricsError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::resolve(headers.iter())?;

    let mut posts = Vec::new();
    let mut dropped_rows = 0usize;
    for (index, row) in reader.records().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(row = index, error = %e, "skipping unreadable CSV row");
                dropped_rows += 1;
                continue;
            }
        };
        match PostRecord::from_row(index, &row, &columns, fallback_followers) {
            Some(post) => posts.push(post),
            None => dropped_rows += 1,
        }
    }

    if dropped_rows > 0 {
        tracing::info!(dropped_rows, "dropped rows without a usable date");
    }

    Ok(Dataset {
        columns,
        posts,
        dropped_rows,
    })
}
