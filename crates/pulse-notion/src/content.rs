//! Text for the Weekly Pulse and Predictive Test pages.

use chrono::NaiveDate;
use pulse_metrics::MetricsReport;

use crate::types::{self, Confidence, InsightType, Properties};

/// Rendered in place of an undefined value.
pub const PLACEHOLDER: &str = "\u{2014}";

/// `|er_delta|` at or above this many points reads as high confidence.
const HIGH_CONFIDENCE_POINTS: f64 = 0.20;

const REACH_WITHOUT_DEPTH: &str = "Broader reach but lower depth \u{2014} test 12\u{2013}15s Reels with stronger first-frame hook.";
const POSITIVE_MOMENTUM: &str = "Positive lift; maintain momentum on current creative focus.";
const ENGAGEMENT_SOFTNESS: &str = "Engagement softness; review hook clarity and emotional framing.";
const OUTLIER_NOTE: &str = " (95th-percentile outliers removed for the ER median).";

/// Formats a value to two decimals, or [`PLACEHOLDER`] when undefined.
#[must_use]
pub fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.2}"))
}

/// One page worth of content, independent of the Notion property encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightContent {
    pub insight_type: InsightType,
    pub headline: String,
    pub metric: String,
    pub confidence: Confidence,
    pub action: String,
}

impl InsightContent {
    /// Encodes the content as Notion page properties dated `today`.
    #[must_use]
    pub fn to_properties(&self, today: NaiveDate) -> Properties {
        let mut props = Properties::new();
        props.insert("Date".into(), types::date(today));
        props.insert(
            "Insight Type".into(),
            types::select(self.insight_type.as_str()),
        );
        props.insert("Headline".into(), types::rich_text(&self.headline));
        props.insert("Metric".into(), types::rich_text(&self.metric));
        props.insert("Confidence".into(), types::select(self.confidence.as_str()));
        props.insert("Status".into(), types::select("Published"));
        props.insert("Action".into(), types::rich_text(&self.action));
        props.insert("Title".into(), types::title(self.insight_type.as_str()));
        props
    }
}

#[must_use]
pub fn confidence(er_delta: Option<f64>) -> Confidence {
    match er_delta {
        Some(d) if d.abs() >= HIGH_CONFIDENCE_POINTS => Confidence::High,
        _ => Confidence::Medium,
    }
}

/// Picks the narrative line. Undefined deltas never satisfy a comparison.
#[must_use]
pub fn narrative(er_delta: Option<f64>, ivr_delta: Option<f64>) -> &'static str {
    let er_up = er_delta.is_some_and(|d| d > 0.0);
    let ivr_down = ivr_delta.is_some_and(|d| d < 0.0);
    match (er_up, ivr_down) {
        (true, true) => REACH_WITHOUT_DEPTH,
        (true, false) => POSITIVE_MOMENTUM,
        _ => ENGAGEMENT_SOFTNESS,
    }
}

/// Builds the always-published Weekly Pulse content.
#[must_use]
pub fn build_weekly_pulse(report: &MetricsReport) -> InsightContent {
    let window = &report.window;
    let headline = format!(
        "ER {} pts vs baseline | IVR {} pts",
        fmt_value(window.er_delta),
        fmt_value(window.ivr_delta)
    );
    let detail = format!(
        "ER {}% (base {:.2}%) \u{2022} IVR {}% (base {:.2}%)",
        fmt_value(window.er_median),
        report.baseline_er,
        fmt_value(window.ivr_median),
        report.baseline_ivr
    );

    let mut summary = narrative(window.er_delta, window.ivr_delta).to_string();
    summary.push_str(OUTLIER_NOTE);
    if let Some(territories) = report.territories.as_deref().filter(|t| !t.is_empty()) {
        let days = (window.window_end - window.window_start).num_days();
        let joined = territories
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        summary.push_str(&format!(
            " Top territories (ER median, {days} d): {joined}."
        ));
    }

    InsightContent {
        insight_type: InsightType::WeeklyPulse,
        headline,
        metric: format!("{} pts", fmt_value(window.er_delta)),
        confidence: confidence(window.er_delta),
        action: format!("{detail}\n{summary}"),
    }
}

/// Builds the Predictive Test content, or `None` unless IVR is defined and
/// strictly below baseline.
#[must_use]
pub fn build_predictive_test(report: &MetricsReport) -> Option<InsightContent> {
    let ivr_delta = report.window.ivr_delta?;
    if ivr_delta >= 0.0 {
        return None;
    }

    Some(InsightContent {
        insight_type: InsightType::PredictiveTest,
        headline: "Predictive Test \u{2014} Lift IVR via first-frame hook + 12\u{2013}15s".to_string(),
        metric: "10\u{2013}15%".to_string(),
        confidence: Confidence::Medium,
        action: format!(
            "IVR {}% vs base {:.2}%. Test: macro first frame, motion in 0.5s, question opener; 12\u{2013}15s.",
            fmt_value(report.window.ivr_median),
            report.baseline_ivr
        ),
    })
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
