//! The default `run` command: load, derive, print, publish.

use chrono::Utc;
use pulse_core::AppConfig;
use pulse_metrics::{derive_report, load_posts, Derivation, DeriverConfig, Field};

use crate::render::{render_columns, render_publish_summary, render_report};

/// Runs the pipeline once.
///
/// An empty window prints a notice and returns `Ok` without touching Notion.
///
/// # Errors
///
/// Returns an error if the input file is missing or unreadable, or if no
/// date column can be resolved. Publishing failures are logged and reported
/// in the summary line but never returned.
pub(crate) async fn run_pipeline(config: &AppConfig, publish: bool) -> anyhow::Result<()> {
    let dataset = load_posts(&config.input_path, config.fallback_followers)?;
    println!("{}", render_columns(&dataset.columns));

    let now = Utc::now();
    let outcome = derive_report(
        &dataset.posts,
        &DeriverConfig::from_app_config(config),
        dataset.columns.has(Field::Territory),
        now,
    );

    let report = match outcome {
        Derivation::NoData => {
            println!("No posts in the last {} days.", config.window_days);
            return Ok(());
        }
        Derivation::Report(report) => report,
    };

    print!("{}", render_report(&report, &config.client_slug));

    if !publish {
        tracing::info!("--no-publish set; skipping Notion write");
        return Ok(());
    }

    let summary = pulse_notion::publish_report(config, &report, now.date_naive()).await;
    println!("{}", render_publish_summary(&summary));
    Ok(())
}
