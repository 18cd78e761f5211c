use std::path::PathBuf;

/// How requests to the YouTube Data API are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Public-data API key, sent as the `key` query parameter.
    ApiKey(String),
    /// Pre-issued OAuth 2.0 access token, sent as a bearer token.
    OAuthToken(String),
}

impl Credentials {
    /// Returns the raw secret regardless of its kind.
    #[must_use]
    pub fn secret(&self) -> &str {
        match self {
            Credentials::ApiKey(s) | Credentials::OAuthToken(s) => s,
        }
    }

    /// Short, secret-free label used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::ApiKey(_) => "api_key",
            Credentials::OAuthToken(_) => "oauth_token",
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple(match self {
            Credentials::ApiKey(_) => "ApiKey",
            Credentials::OAuthToken(_) => "OAuthToken",
        })
        .field(&"[redacted]")
        .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub api_base_url: String,
    pub log_level: String,
    pub output_dir: PathBuf,
    pub batch_size: usize,
    pub max_concurrent_batches: usize,
    pub max_attempts: u32,
    pub retry_backoff_base_ms: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("credentials", &self.credentials)
            .field("api_base_url", &self.api_base_url)
            .field("log_level", &self.log_level)
            .field("output_dir", &self.output_dir)
            .field("batch_size", &self.batch_size)
            .field("max_concurrent_batches", &self.max_concurrent_batches)
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
