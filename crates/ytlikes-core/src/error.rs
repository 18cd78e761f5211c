use thiserror::Error;

/// Errors raised while loading [`crate::AppConfig`]. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("no YouTube credentials configured: set YOUTUBE_API_KEY or YOUTUBE_OAUTH_TOKEN")]
    MissingCredentials,
}
