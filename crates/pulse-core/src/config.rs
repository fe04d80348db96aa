use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{
    AppConfig, DEFAULT_CLIENT_SLUG, DEFAULT_INPUT_PATH, DEFAULT_NOTION_BASE_URL,
};
use crate::ConfigError;

/// Longest accepted trailing window, roughly a century.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Name of the env var holding the database id for a client slug, e.g.
/// `masplus` -> `NOTION_DB_MASPLUS`.
#[must_use]
pub fn database_id_var(slug: &str) -> String {
    format!("NOTION_DB_{}", slug.trim().to_uppercase())
}

/// Reads the database id for `slug` from the process environment, treating a
/// blank value as unset.
#[must_use]
pub fn client_database_id(slug: &str) -> Option<String> {
    std::env::var(database_id_var(slug))
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank values count as unset, matching how `.env` templates are usually left.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let parse_f64 = |var: &str, default: f64| -> Result<f64, ConfigError> {
        parse_or(optional(var), var, default)
    };

    let client_slug = or_default("PULSE_CLIENT_SLUG", DEFAULT_CLIENT_SLUG);
    let notion_database_id = optional(&database_id_var(&client_slug));

    let window_days = parse_or(optional("PULSE_WINDOW_DAYS"), "PULSE_WINDOW_DAYS", 30_i64)?;
    if !(1..=MAX_WINDOW_DAYS).contains(&window_days) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PULSE_WINDOW_DAYS".to_string(),
            reason: format!("must be between 1 and {MAX_WINDOW_DAYS}, got {window_days}"),
        });
    }

    Ok(AppConfig {
        input_path: PathBuf::from(or_default("HC_INPUT_CSV", DEFAULT_INPUT_PATH)),
        baseline_er: parse_f64("BASELINE_ER_MEDIAN", 0.0)?,
        baseline_ivr: parse_f64("BASELINE_IVR_MEDIAN", 0.0)?,
        fallback_followers: parse_f64("HC_FOLLOWERS", 0.0)?,
        window_days,
        client_slug,
        notion_token: optional("NOTION_TOKEN"),
        notion_database_id,
        notion_base_url: or_default("PULSE_NOTION_BASE_URL", DEFAULT_NOTION_BASE_URL),
        request_timeout_secs: parse_or(
            optional("PULSE_REQUEST_TIMEOUT_SECS"),
            "PULSE_REQUEST_TIMEOUT_SECS",
            30_u64,
        )?,
        log_level: or_default("PULSE_LOG_LEVEL", "info"),
    })
}

fn parse_or<T>(raw: Option<String>, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
