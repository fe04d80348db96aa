use anyhow::Context;
use pulse_core::AppConfig;
use pulse_notion::NotionClient;

use crate::render::render_insight;

/// Prints every published insight for the configured client, newest first.
///
/// # Errors
///
/// Returns an error if credentials are missing or the Notion query fails.
pub(crate) async fn run_insights(config: &AppConfig) -> anyhow::Result<()> {
    let (token, database_id) = config.notion_credentials().ok_or_else(|| {
        anyhow::anyhow!(
            "NOTION_TOKEN or {} is not set; cannot list insights",
            pulse_core::database_id_var(&config.client_slug)
        )
    })?;

    let client = NotionClient::with_base_url(
        token,
        config.request_timeout_secs,
        &config.notion_base_url,
    )?;
    let pages = client
        .list_published(database_id)
        .await
        .with_context(|| format!("failed to list insights for '{}'", config.client_slug))?;

    if pages.is_empty() {
        println!("No published insights yet for {}.", config.client_slug);
        return Ok(());
    }

    for page in &pages {
        println!("{}", render_insight(&page.summary()));
    }
    Ok(())
}
