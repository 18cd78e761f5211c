//! HTTP client for the `YouTube` Data API v3.
//!
//! Wraps `reqwest` with credential handling, `YouTube`-specific error
//! classification, and typed response deserialization. Each lookup method
//! issues exactly one request for up to [`MAX_API_BATCH_SIZE`] ids.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use ytlikes_core::config::MAX_API_BATCH_SIZE;
use ytlikes_core::{AppConfig, Credentials};

use crate::error::YoutubeError;
use crate::types::{ApiErrorEnvelope, CommentItem, ListResponse, VideoItem};

const QUOTA_REASONS: &[&str] = &["quotaExceeded", "dailyLimitExceeded"];
const RATE_LIMIT_REASONS: &[&str] = &["rateLimitExceeded", "userRateLimitExceeded"];

/// Client for the `YouTube` Data API.
///
/// Owns the authenticated session for the whole run: credentials are checked
/// once at construction and attached to every request. Use
/// [`YoutubeClient::from_config`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    credentials: Credentials,
    base_url: Url,
}

impl YoutubeClient {
    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`YoutubeClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, YoutubeError> {
        Self::with_base_url(
            config.credentials.clone(),
            config.request_timeout_secs,
            &config.user_agent,
            &config.api_base_url,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::InvalidCredentials`] if the secret is blank.
    /// - [`YoutubeError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`YoutubeError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        credentials: Credentials,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        if credentials.secret().trim().is_empty() {
            return Err(YoutubeError::InvalidCredentials(format!(
                "{} is empty",
                credentials.kind()
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends to the API root
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| YoutubeError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        tracing::debug!(credentials = credentials.kind(), base_url = %base_url, "YouTube client ready");

        Ok(Self {
            client,
            credentials,
            base_url,
        })
    }

    /// Looks up video titles for up to [`MAX_API_BATCH_SIZE`] video ids.
    ///
    /// Ids the API does not return (deleted, private) are simply absent from
    /// the map.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::TooManyIds`] if more than [`MAX_API_BATCH_SIZE`] ids are given.
    /// - [`YoutubeError::RateLimited`], [`YoutubeError::QuotaExceeded`],
    ///   [`YoutubeError::Unauthorized`], [`YoutubeError::ServerError`], or
    ///   [`YoutubeError::Api`] for non-2xx responses.
    /// - [`YoutubeError::Http`] on network failure.
    /// - [`YoutubeError::Deserialize`] if the body has an unexpected shape.
    pub async fn get_video_titles(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, String>, YoutubeError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Self::check_batch_len(ids)?;

        let joined = ids.join(",");
        let url = self.build_url("videos", &[("part", "snippet"), ("id", &joined)])?;
        let response: ListResponse<VideoItem> = self
            .request_json(&url, &format!("videos.list({} ids)", ids.len()))
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.snippet.map(|s| (item.id, s.title)))
            .collect())
    }

    /// Looks up like counts for up to [`MAX_API_BATCH_SIZE`] comment ids.
    ///
    /// Ids the API does not return (deleted, held, or on private videos) are
    /// absent from the map.
    ///
    /// # Errors
    ///
    /// Same as [`YoutubeClient::get_video_titles`].
    pub async fn get_comment_like_counts(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, u64>, YoutubeError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Self::check_batch_len(ids)?;

        let joined = ids.join(",");
        let url = self.build_url(
            "comments",
            &[
                ("part", "snippet"),
                ("textFormat", "plainText"),
                ("id", &joined),
            ],
        )?;
        let response: ListResponse<CommentItem> = self
            .request_json(&url, &format!("comments.list({} ids)", ids.len()))
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|item| {
                let likes = item.snippet.map_or(0, |s| s.like_count);
                (item.id, likes)
            })
            .collect())
    }

    fn check_batch_len(ids: &[String]) -> Result<(), YoutubeError> {
        if ids.len() > MAX_API_BATCH_SIZE {
            return Err(YoutubeError::TooManyIds {
                count: ids.len(),
                max: MAX_API_BATCH_SIZE,
            });
        }
        Ok(())
    }

    /// Builds the request URL for `resource` with percent-encoded query
    /// parameters. API-key credentials travel as the `key` parameter.
    fn build_url(&self, resource: &str, extra: &[(&str, &str)]) -> Result<Url, YoutubeError> {
        let mut url = self
            .base_url
            .join(resource)
            .map_err(|e| YoutubeError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            if let Credentials::ApiKey(key) = &self.credentials {
                pairs.append_pair("key", key);
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::OAuthToken(token) => request.bearer_auth(token),
            Credentials::ApiKey(_) => request,
        }
    }

    /// Sends a GET request, maps non-2xx responses to typed errors, and
    /// deserializes the body.
    async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, YoutubeError> {
        let response = self
            .authorize(self.client.get(url.clone()))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify_error(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Turns a non-2xx response into the matching [`YoutubeError`] variant.
    async fn classify_error(response: Response) -> YoutubeError {
        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();

        let (reason, message) = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
            Ok(envelope) => (
                envelope.error.reason().unwrap_or_default().to_owned(),
                envelope.error.message,
            ),
            Err(_) => (String::new(), body.chars().take(200).collect()),
        };

        Self::error_for(status, &reason, message, retry_after_secs)
    }

    fn error_for(
        status: StatusCode,
        reason: &str,
        message: String,
        retry_after_secs: Option<u64>,
    ) -> YoutubeError {
        let code = status.as_u16();
        if QUOTA_REASONS.contains(&reason) {
            return YoutubeError::QuotaExceeded(message);
        }
        if status == StatusCode::TOO_MANY_REQUESTS || RATE_LIMIT_REASONS.contains(&reason) {
            return YoutubeError::RateLimited {
                status: code,
                retry_after_secs,
            };
        }
        if status.is_server_error() {
            return YoutubeError::ServerError {
                status: code,
                message,
            };
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return YoutubeError::Unauthorized {
                status: code,
                message,
            };
        }
        YoutubeError::Api {
            status: code,
            reason: reason.to_owned(),
            message,
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
