//! Plain-text rendering of the stdout report.

use std::fmt::Write as _;

use pulse_metrics::{ColumnMap, Field, MetricsReport, RankedPost};
use pulse_notion::content::{fmt_value, PLACEHOLDER};
use pulse_notion::{InsightSummary, PublishSummary};

/// One line naming the source header chosen for each field.
pub(crate) fn render_columns(columns: &ColumnMap) -> String {
    let parts: Vec<String> = Field::ALL
        .iter()
        .map(|field| {
            format!(
                "{}: {}",
                field.label(),
                columns.name(*field).unwrap_or(PLACEHOLDER)
            )
        })
        .collect();
    format!("Columns used -> {}", parts.join(" | "))
}

pub(crate) fn render_report(report: &MetricsReport, client_slug: &str) -> String {
    let window = &report.window;
    let days = (window.window_end - window.window_start).num_days();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n{} \u{2014} Movement vs Baseline (last {days} days)\n",
        client_slug.to_uppercase()
    );
    let _ = writeln!(
        out,
        "Baseline: ER {:.2}% | IVR {:.2}%",
        report.baseline_er, report.baseline_ivr
    );
    let _ = writeln!(
        out,
        "Latest {days} d: ER {}% | IVR {}%",
        fmt_value(window.er_median),
        fmt_value(window.ivr_median)
    );
    let _ = writeln!(
        out,
        "\u{0394} vs baseline: ER {} pts | IVR {} pts",
        fmt_value(window.er_delta),
        fmt_value(window.ivr_delta)
    );
    let _ = writeln!(
        out,
        "Posts in window: {} ({} above ER p95 {} removed from medians)\n",
        window.members.len(),
        window.trimmed_count(),
        fmt_value(window.er_p95)
    );

    render_ranked(&mut out, "Top by ER uplift:", &report.top);
    render_ranked(&mut out, "Bottom by ER uplift:", &report.bottom);
    out
}

fn render_ranked(out: &mut String, title: &str, rows: &[RankedPost]) {
    let _ = writeln!(out, "{title}");
    for row in rows {
        let _ = writeln!(
            out,
            " - {} | ER {}% | \u{0394} {} pts | {}",
            row.post.date.format("%Y-%m-%d"),
            fmt_value(row.post.er),
            fmt_value(row.er_uplift),
            row.post.url.as_deref().unwrap_or("")
        );
    }
    let _ = writeln!(out);
}

pub(crate) fn render_publish_summary(summary: &PublishSummary) -> String {
    format!(
        "Notion: Weekly Pulse {} | Predictive Test {}",
        summary.pulse, summary.predictive
    )
}

pub(crate) fn render_insight(insight: &InsightSummary) -> String {
    format!(
        "{} | {} | {} | {}",
        insight.date.as_deref().unwrap_or(PLACEHOLDER),
        insight.insight_type.as_deref().unwrap_or(PLACEHOLDER),
        insight.title,
        insight.metric.as_deref().unwrap_or("")
    )
}
