//! Idempotent create-or-update of the day's insight pages.
//!
//! Every insight type is upserted independently: a failure on one never
//! prevents the attempt on the next, and nothing here aborts the run.

use chrono::NaiveDate;
use pulse_core::AppConfig;
use pulse_metrics::MetricsReport;

use crate::client::NotionClient;
use crate::content::{build_predictive_test, build_weekly_pulse, InsightContent};

/// What happened to one insight page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(String),
    Updated(String),
    /// Remote writes disabled (missing credentials or `--no-publish`).
    Skipped,
    /// The content rules did not call for this page.
    NotEmitted,
    Failed(String),
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Created(id) => write!(f, "created ({id})"),
            Outcome::Updated(id) => write!(f, "updated ({id})"),
            Outcome::Skipped => f.write_str("skipped"),
            Outcome::NotEmitted => f.write_str("not needed"),
            Outcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSummary {
    pub pulse: Outcome,
    pub predictive: Outcome,
}

impl PublishSummary {
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            pulse: Outcome::Skipped,
            predictive: Outcome::Skipped,
        }
    }
}

/// Writes insight pages into one database.
pub struct Publisher {
    client: NotionClient,
    database_id: String,
}

impl Publisher {
    #[must_use]
    pub fn new(client: NotionClient, database_id: &str) -> Self {
        Self {
            client,
            database_id: database_id.to_string(),
        }
    }

    /// Upserts the Weekly Pulse and, when warranted, the Predictive Test page
    /// for `today`.
    pub async fn publish(&self, report: &MetricsReport, today: NaiveDate) -> PublishSummary {
        let pulse = self.upsert(&build_weekly_pulse(report), today).await;

        let predictive = match build_predictive_test(report) {
            Some(content) => self.upsert(&content, today).await,
            None => Outcome::NotEmitted,
        };

        PublishSummary { pulse, predictive }
    }

    /// Updates today's page of the content's type if one exists, otherwise
    /// creates it.
    ///
    /// A failed lookup is reported as [`Outcome::Failed`] without creating,
    /// so an unreachable query can never produce a second page for the day.
    pub async fn upsert(&self, content: &InsightContent, today: NaiveDate) -> Outcome {
        let insight_type = content.insight_type;
        let properties = content.to_properties(today);

        let existing = match self
            .client
            .query_by_type_and_date(&self.database_id, insight_type, today)
            .await
        {
            Ok(existing) => existing,
            Err(e) => {
                tracing::warn!(%insight_type, error = %e, "Notion query failed");
                return Outcome::Failed(e.to_string());
            }
        };

        match existing {
            Some(page) => match self.client.update_page(&page.id, &properties).await {
                Ok(_) => {
                    tracing::info!(%insight_type, page_id = %page.id, "Notion page updated");
                    Outcome::Updated(page.id)
                }
                Err(e) => {
                    tracing::error!(%insight_type, page_id = %page.id, error = %e, "Notion update failed");
                    Outcome::Failed(e.to_string())
                }
            },
            None => match self.client.create_page(&self.database_id, &properties).await {
                Ok(page) => {
                    tracing::info!(%insight_type, page_id = %page.id, "Notion page created");
                    Outcome::Created(page.id)
                }
                Err(e) => {
                    tracing::error!(%insight_type, error = %e, "Notion create failed");
                    Outcome::Failed(e.to_string())
                }
            },
        }
    }
}

/// Publishes `report` using the credentials in `config`.
///
/// Missing token or database id skips every remote call with one warning.
pub async fn publish_report(
    config: &AppConfig,
    report: &MetricsReport,
    today: NaiveDate,
) -> PublishSummary {
    let Some((token, database_id)) = config.notion_credentials() else {
        tracing::warn!(
            database_var = %pulse_core::database_id_var(&config.client_slug),
            "missing NOTION_TOKEN or database id; skipping Notion write"
        );
        return PublishSummary::skipped();
    };

    let client = match NotionClient::with_base_url(
        token,
        config.request_timeout_secs,
        &config.notion_base_url,
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build Notion client");
            let outcome = Outcome::Failed(e.to_string());
            return PublishSummary {
                pulse: outcome.clone(),
                predictive: outcome,
            };
        }
    };

    Publisher::new(client, database_id).publish(report, today).await
}
