//! The remote lookup capability the enrichment stage is built against.

use std::collections::HashMap;
use std::future::Future;

use crate::client::YoutubeClient;
use crate::error::YoutubeError;

/// Batched, read-only lookups against `YouTube`.
///
/// Each call covers one batch of ids and returns a partial map: an id missing
/// from the result means the content was not found, not that the call failed.
/// Failures are reported as [`YoutubeError`], and callers decide whether to
/// retry via [`YoutubeError::is_transient`].
pub trait YoutubeLookup: Send + Sync {
    /// Maps video ids to their titles.
    fn video_titles(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<HashMap<String, String>, YoutubeError>> + Send;

    /// Maps comment ids to their current like counts.
    fn comment_like_counts(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<HashMap<String, u64>, YoutubeError>> + Send;
}

impl YoutubeLookup for YoutubeClient {
    async fn video_titles(&self, ids: &[String]) -> Result<HashMap<String, String>, YoutubeError> {
        self.get_video_titles(ids).await
    }

    async fn comment_like_counts(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, u64>, YoutubeError> {
        self.get_comment_like_counts(ids).await
    }
}
