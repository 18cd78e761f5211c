use thiserror::Error;

/// Errors returned by the `YouTube` Data API client.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 or a `rateLimitExceeded` reason: slow down and try again.
    #[error("rate limited by YouTube API (HTTP {status})")]
    RateLimited {
        status: u16,
        retry_after_secs: Option<u64>,
    },

    /// The project's daily quota is spent; retrying today will not help.
    #[error("YouTube API quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Credentials were rejected.
    #[error("YouTube API rejected credentials (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// HTTP 5xx from the API.
    #[error("YouTube API server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-2xx response.
    #[error("YouTube API error (HTTP {status}, reason {reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// More ids than one API call accepts.
    #[error("{count} ids requested in one call; the API accepts at most {max}")]
    TooManyIds { count: usize, max: usize },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

impl YoutubeError {
    /// Returns `true` for errors that are worth retrying after a back-off delay.
    ///
    /// **Retriable:** timeouts, connection failures, connections dropped
    /// mid-request or mid-body, HTTP 5xx, and rate-limit responses.
    ///
    /// **Not retriable:** quota exhaustion, rejected credentials, other API
    /// errors, malformed bodies, and caller mistakes.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            YoutubeError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.is_body()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            YoutubeError::RateLimited { .. } | YoutubeError::ServerError { .. } => true,
            YoutubeError::QuotaExceeded(_)
            | YoutubeError::Unauthorized { .. }
            | YoutubeError::Api { .. }
            | YoutubeError::Deserialize { .. }
            | YoutubeError::TooManyIds { .. }
            | YoutubeError::InvalidBaseUrl { .. }
            | YoutubeError::InvalidCredentials(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_is_transient() {
        assert!(YoutubeError::RateLimited {
            status: 429,
            retry_after_secs: None
        }
        .is_transient());
    }

    #[test]
    fn server_error_is_transient() {
        assert!(YoutubeError::ServerError {
            status: 503,
            message: "backend".to_owned()
        }
        .is_transient());
    }

    #[test]
    fn quota_exceeded_is_not_transient() {
        assert!(!YoutubeError::QuotaExceeded("daily".to_owned()).is_transient());
    }

    #[test]
    fn unauthorized_is_not_transient() {
        assert!(!YoutubeError::Unauthorized {
            status: 403,
            message: "forbidden".to_owned()
        }
        .is_transient());
    }

    #[test]
    fn deserialize_error_is_not_transient() {
        let src = serde_json::from_str::<()>("invalid").unwrap_err();
        assert!(!YoutubeError::Deserialize {
            context: "test".to_owned(),
            source: src,
        }
        .is_transient());
    }
}
