use std::path::PathBuf;

pub const DEFAULT_INPUT_PATH: &str = "latest_posts.csv";
pub const DEFAULT_CLIENT_SLUG: &str = "masplus";
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com/v1/";

/// Process-wide settings, built once at startup and passed by reference to
/// the deriver and the publisher.
#[derive(Clone)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub baseline_er: f64,
    pub baseline_ivr: f64,
    /// Applied to every row when the export carries no followers column.
    pub fallback_followers: f64,
    pub window_days: i64,
    pub client_slug: String,
    pub notion_token: Option<String>,
    pub notion_database_id: Option<String>,
    pub notion_base_url: String,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl AppConfig {
    /// Returns the token and database id together, or `None` when either is
    /// missing and remote writes must be skipped.
    #[must_use]
    pub fn notion_credentials(&self) -> Option<(&str, &str)> {
        match (
            self.notion_token.as_deref(),
            self.notion_database_id.as_deref(),
        ) {
            (Some(token), Some(db)) => Some((token, db)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("input_path", &self.input_path)
            .field("baseline_er", &self.baseline_er)
            .field("baseline_ivr", &self.baseline_ivr)
            .field("fallback_followers", &self.fallback_followers)
            .field("window_days", &self.window_days)
            .field("client_slug", &self.client_slug)
            .field(
                "notion_token",
                &self.notion_token.as_ref().map(|_| "[redacted]"),
            )
            .field("notion_database_id", &self.notion_database_id)
            .field("notion_base_url", &self.notion_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}
