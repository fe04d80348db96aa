use chrono::{Duration, TimeZone, Utc};
use pulse_metrics::{AggregateWindow, TerritoryMedian};

use super::*;

fn report(er_delta: Option<f64>, ivr_delta: Option<f64>) -> MetricsReport {
    let end = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
    MetricsReport {
        window: AggregateWindow {
            window_start: end - Duration::days(30),
            window_end: end,
            members: Vec::new(),
            trimmed_members: Vec::new(),
            er_p95: None,
            er_median: er_delta.map(|d| d + 2.0),
            ivr_median: ivr_delta.map(|d| d + 8.0),
            er_delta,
            ivr_delta,
        },
        baseline_er: 2.0,
        baseline_ivr: 8.0,
        top: Vec::new(),
        bottom: Vec::new(),
        territories: None,
    }
}

#[test]
fn fmt_value_uses_placeholder_for_undefined() {
    assert_eq!(fmt_value(None), "\u{2014}");
    assert_eq!(fmt_value(Some(0.0)), "0.00");
    assert_eq!(fmt_value(Some(-1.234)), "-1.23");
}

#[test]
fn confidence_threshold_is_inclusive() {
    assert_eq!(confidence(Some(0.20)), Confidence::High);
    assert_eq!(confidence(Some(-0.25)), Confidence::High);
    assert_eq!(confidence(Some(0.19)), Confidence::Medium);
    assert_eq!(confidence(None), Confidence::Medium);
}

#[test]
fn narrative_priority_order() {
    assert_eq!(narrative(Some(0.5), Some(-0.1)), REACH_WITHOUT_DEPTH);
    assert_eq!(narrative(Some(0.5), Some(0.1)), POSITIVE_MOMENTUM);
    assert_eq!(narrative(Some(0.5), None), POSITIVE_MOMENTUM);
    assert_eq!(narrative(Some(0.0), Some(-1.0)), ENGAGEMENT_SOFTNESS);
    assert_eq!(narrative(None, Some(-1.0)), ENGAGEMENT_SOFTNESS);
}

#[test]
fn weekly_pulse_headline_and_detail() {
    let content = build_weekly_pulse(&report(Some(0.5), Some(-0.25)));
    assert_eq!(content.insight_type, InsightType::WeeklyPulse);
    assert_eq!(content.headline, "ER 0.50 pts vs baseline | IVR -0.25 pts");
    assert_eq!(content.metric, "0.50 pts");
    assert_eq!(content.confidence, Confidence::High);
    assert_eq!(
        content.action,
        format!(
            "ER 2.50% (base 2.00%) \u{2022} IVR 7.75% (base 8.00%)\n{REACH_WITHOUT_DEPTH}{OUTLIER_NOTE}"
        )
    );
}

#[test]
fn weekly_pulse_renders_placeholders_not_zero() {
    let content = build_weekly_pulse(&report(None, None));
    assert_eq!(
        content.headline,
        "ER \u{2014} pts vs baseline | IVR \u{2014} pts"
    );
    assert!(!content.headline.contains("0.00"));
    assert!(content.action.contains(ENGAGEMENT_SOFTNESS));
}

#[test]
fn weekly_pulse_appends_territories() {
    let mut report = report(Some(0.1), None);
    report.territories = Some(vec![
        TerritoryMedian {
            territory: "South".into(),
            er_median: 4.0,
        },
        TerritoryMedian {
            territory: "North".into(),
            er_median: 2.0,
        },
    ]);
    let content = build_weekly_pulse(&report);
    assert!(content
        .action
        .ends_with(" Top territories (ER median, 30 d): South: 4.00%; North: 2.00%."));
}

#[test]
fn predictive_test_only_for_negative_ivr_delta() {
    assert!(build_predictive_test(&report(Some(0.1), Some(-0.5))).is_some());
    assert!(build_predictive_test(&report(Some(0.1), Some(0.5))).is_none());
    assert!(build_predictive_test(&report(Some(0.1), Some(0.0))).is_none());
    assert!(build_predictive_test(&report(Some(0.1), None)).is_none());
}

#[test]
fn predictive_test_mentions_ivr_and_baseline() {
    let content = build_predictive_test(&report(None, Some(-0.5))).unwrap();
    assert_eq!(content.insight_type, InsightType::PredictiveTest);
    assert_eq!(content.confidence, Confidence::Medium);
    assert!(content.action.starts_with("IVR 7.50% vs base 8.00%."));
}

#[test]
fn properties_carry_every_column() {
    let day = chrono::NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
    let props = build_weekly_pulse(&report(Some(0.1), None)).to_properties(day);
    for key in [
        "Date",
        "Insight Type",
        "Headline",
        "Metric",
        "Confidence",
        "Status",
        "Action",
        "Title",
    ] {
        assert!(props.contains_key(key), "missing {key}");
    }
    assert_eq!(props["Insight Type"]["select"]["name"], "Weekly Pulse");
    assert_eq!(props["Status"]["select"]["name"], "Published");
    assert_eq!(props["Confidence"]["select"]["name"], "Medium");
    assert_eq!(props["Date"]["date"]["start"], "2025-06-30");
}
