//! Trailing-window aggregation: windowing, the ER outlier guard, medians,
//! deltas against baselines, uplift ranking and the territory breakdown.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use pulse_core::AppConfig;

use crate::record::PostRecord;
use crate::stats::{median, percentile};

/// Percentile above which ER values are treated as outliers.
pub const OUTLIER_PERCENTILE: f64 = 0.95;

const RANK_LIMIT: usize = 3;
const TERRITORY_LIMIT: usize = 3;

/// The subset of [`AppConfig`] the aggregation step reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeriverConfig {
    pub baseline_er: f64,
    pub baseline_ivr: f64,
    pub window_days: i64,
}

impl DeriverConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            baseline_er: config.baseline_er,
            baseline_ivr: config.baseline_ivr,
            window_days: config.window_days,
        }
    }
}

impl Default for DeriverConfig {
    fn default() -> Self {
        Self {
            baseline_er: 0.0,
            baseline_ivr: 0.0,
            window_days: 30,
        }
    }
}

/// Window membership and headline statistics for one run.
#[derive(Debug, Clone)]
pub struct AggregateWindow {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub members: Vec<PostRecord>,
    /// `members` without rows whose defined ER exceeds [`Self::er_p95`].
    pub trimmed_members: Vec<PostRecord>,
    pub er_p95: Option<f64>,
    pub er_median: Option<f64>,
    pub ivr_median: Option<f64>,
    pub er_delta: Option<f64>,
    pub ivr_delta: Option<f64>,
}

impl AggregateWindow {
    /// Number of rows removed by the outlier guard.
    #[must_use]
    pub fn trimmed_count(&self) -> usize {
        self.members.len() - self.trimmed_members.len()
    }
}

/// A windowed post with its ER distance from the baseline.
#[derive(Debug, Clone)]
pub struct RankedPost {
    pub post: PostRecord,
    pub er_uplift: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerritoryMedian {
    pub territory: String,
    pub er_median: f64,
}

impl std::fmt::Display for TerritoryMedian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.2}%", self.territory, self.er_median)
    }
}

/// Everything the publisher and the stdout report need.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub window: AggregateWindow,
    pub baseline_er: f64,
    pub baseline_ivr: f64,
    pub top: Vec<RankedPost>,
    pub bottom: Vec<RankedPost>,
    /// `None` when the export has no territory column.
    pub territories: Option<Vec<TerritoryMedian>>,
}

/// Outcome of the aggregation step.
#[derive(Debug, Clone)]
pub enum Derivation {
    /// No post falls inside the window. Not an error; nothing is published.
    NoData,
    Report(Box<MetricsReport>),
}

/// Aggregates `posts` over the window ending at `now`.
///
/// `has_territory` reports whether the export carried a territory column; the
/// breakdown is only produced when it did.
#[must_use]
pub fn derive_report(
    posts: &[PostRecord],
    config: &DeriverConfig,
    has_territory: bool,
    now: DateTime<Utc>,
) -> Derivation {
    // Windows reaching past the calendar range start at its earliest instant.
    let window_start = Duration::try_days(config.window_days)
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let members: Vec<PostRecord> = posts
        .iter()
        .filter(|p| p.date >= window_start)
        .cloned()
        .collect();

    if members.is_empty() {
        tracing::info!(%window_start, "no posts inside the window");
        return Derivation::NoData;
    }

    let er_p95 = percentile(members.iter().map(|p| p.er), OUTLIER_PERCENTILE);
    let trimmed_members = trim_outliers(&members, er_p95);

    let er_median = median(trimmed_members.iter().map(|p| p.er));
    let ivr_median = median(trimmed_members.iter().map(|p| p.ivr));
    let er_delta = er_median.map(|m| m - config.baseline_er);
    let ivr_delta = ivr_median.map(|m| m - config.baseline_ivr);

    tracing::debug!(
        members = members.len(),
        trimmed = members.len() - trimmed_members.len(),
        ?er_p95,
        ?er_median,
        ?ivr_median,
        "window aggregated"
    );

    let (top, bottom) = rank_by_uplift(&members, config.baseline_er);
    let territories = has_territory.then(|| territory_breakdown(&trimmed_members));

    Derivation::Report(Box::new(MetricsReport {
        window: AggregateWindow {
            window_start,
            window_end: now,
            members,
            trimmed_members,
            er_p95,
            er_median,
            ivr_median,
            er_delta,
            ivr_delta,
        },
        baseline_er: config.baseline_er,
        baseline_ivr: config.baseline_ivr,
        top,
        bottom,
        territories,
    }))
}

/// Drops rows whose defined ER exceeds `threshold`. Rows with undefined ER
/// always pass, and an undefined threshold keeps everything.
#[must_use]
pub fn trim_outliers(members: &[PostRecord], threshold: Option<f64>) -> Vec<PostRecord> {
    members
        .iter()
        .filter(|p| match (p.er, threshold) {
            (Some(er), Some(limit)) => er <= limit,
            _ => true,
        })
        .cloned()
        .collect()
}

/// Top and bottom posts by `er - baseline_er`.
///
/// Both sorts are stable, so ties keep input order; undefined uplift sorts
/// last in either direction.
#[must_use]
pub fn rank_by_uplift(members: &[PostRecord], baseline_er: f64) -> (Vec<RankedPost>, Vec<RankedPost>) {
    let ranked: Vec<RankedPost> = members
        .iter()
        .map(|p| RankedPost {
            post: p.clone(),
            er_uplift: p.er.map(|er| er - baseline_er),
        })
        .collect();

    let mut descending = ranked.clone();
    descending.sort_by(|a, b| match (a.er_uplift, b.er_uplift) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut ascending = ranked;
    ascending.sort_by(|a, b| match (a.er_uplift, b.er_uplift) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    descending.truncate(RANK_LIMIT);
    ascending.truncate(RANK_LIMIT);
    (descending, ascending)
}

/// Per-territory ER medians over the trimmed set, best three first.
///
/// Rows without a territory are ignored, as are territories with no defined ER.
#[must_use]
pub fn territory_breakdown(trimmed: &[PostRecord]) -> Vec<TerritoryMedian> {
    let mut groups: BTreeMap<&str, Vec<Option<f64>>> = BTreeMap::new();
    for post in trimmed {
        if let Some(territory) = post.territory.as_deref() {
            groups.entry(territory).or_default().push(post.er);
        }
    }

    let mut medians: Vec<TerritoryMedian> = groups
        .into_iter()
        .filter_map(|(territory, ers)| {
            median(ers).map(|er_median| TerritoryMedian {
                territory: territory.to_string(),
                er_median,
            })
        })
        .collect();

    medians.sort_by(|a, b| b.er_median.total_cmp(&a.er_median));
    medians.truncate(TERRITORY_LIMIT);
    medians
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
