use crate::app_config::{AppConfig, Credentials};
use crate::ConfigError;

/// Largest `id=` list the YouTube Data API accepts in one call.
pub const MAX_API_BATCH_SIZE: usize = 50;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if credentials are missing or values are invalid.
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
/// Returns `ConfigError` if credentials are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let non_empty = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let at_least_one = |var: &str, value: u64| -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    };

    let credentials = match (
        non_empty("YOUTUBE_OAUTH_TOKEN"),
        non_empty("YOUTUBE_API_KEY"),
    ) {
        (Some(token), _) => Credentials::OAuthToken(token),
        (None, Some(key)) => Credentials::ApiKey(key),
        (None, None) => return Err(ConfigError::MissingCredentials),
    };

    let api_base_url = or_default("YTLIKES_API_BASE_URL", DEFAULT_API_BASE_URL);
    let log_level = or_default("YTLIKES_LOG_LEVEL", "info");
    let output_dir = PathBuf::from(or_default("YTLIKES_OUTPUT_DIR", "."));

    let batch_size = parse_usize("YTLIKES_BATCH_SIZE", "50")?;
    if !(1..=MAX_API_BATCH_SIZE).contains(&batch_size) {
        return Err(ConfigError::InvalidEnvVar {
            var: "YTLIKES_BATCH_SIZE".to_string(),
            reason: format!("must be between 1 and {MAX_API_BATCH_SIZE}, got {batch_size}"),
        });
    }

    let max_concurrent_batches = parse_usize("YTLIKES_MAX_CONCURRENT_BATCHES", "5")?;
    at_least_one("YTLIKES_MAX_CONCURRENT_BATCHES", max_concurrent_batches as u64)?;

    let max_attempts = parse_u32("YTLIKES_MAX_ATTEMPTS", "3")?;
    at_least_one("YTLIKES_MAX_ATTEMPTS", u64::from(max_attempts))?;

    let retry_backoff_base_ms = parse_u64("YTLIKES_RETRY_BACKOFF_BASE_MS", "1000")?;
    let request_timeout_secs = parse_u64("YTLIKES_REQUEST_TIMEOUT_SECS", "30")?;
    at_least_one("YTLIKES_REQUEST_TIMEOUT_SECS", request_timeout_secs)?;

    let user_agent = or_default("YTLIKES_USER_AGENT", "ytlikes/0.1 (comment-history)");

    Ok(AppConfig {
        credentials,
        api_base_url,
        log_level,
        output_dir,
        batch_size,
        max_concurrent_batches,
        max_attempts,
        retry_backoff_base_ms,
        request_timeout_secs,
        user_agent,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
