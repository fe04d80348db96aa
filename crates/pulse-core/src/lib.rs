//! Shared configuration for the pulse pipeline.

mod app_config;
mod config;
mod error;

pub use app_config::{AppConfig, DEFAULT_CLIENT_SLUG, DEFAULT_INPUT_PATH, DEFAULT_NOTION_BASE_URL};
pub use config::{
    client_database_id, database_id_var, load_app_config, load_app_config_from_env,
    MAX_WINDOW_DAYS,
};
pub use error::ConfigError;
