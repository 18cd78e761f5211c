//! Batched, bounded-concurrency lookups that settle pending records.
//!
//! Every distinct comment id gets one like-count lookup and every distinct
//! video id one title lookup per run, packed into batches of at most
//! [`FetchConfig::batch_size`] ids. Batches run concurrently up to
//! [`FetchConfig::max_concurrent_batches`]. Each batch yields its own result
//! map; records are only touched after every batch has finished, so
//! completion order has no effect on the outcome.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use ytlikes_core::config::MAX_API_BATCH_SIZE;
use ytlikes_core::{AppConfig, CommentRecord, FetchStatus};
use ytlikes_youtube::{YoutubeError, YoutubeLookup};

use crate::retry::{retry_with_backoff, RetryPolicy};

/// Batching, concurrency, and retry knobs for [`BatchFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    /// Maximum ids per lookup call.
    pub batch_size: usize,
    /// Maximum lookup calls in flight at once.
    pub max_concurrent_batches: usize,
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_API_BATCH_SIZE,
            max_concurrent_batches: 5,
            retry: RetryPolicy::default(),
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            max_concurrent_batches: config.max_concurrent_batches.max(1),
            retry: RetryPolicy::new(
                config.max_attempts,
                Duration::from_millis(config.retry_backoff_base_ms),
            ),
        }
    }
}

/// Counters describing the network work done by one [`BatchFetcher::fetch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub comment_batches: usize,
    pub video_batches: usize,
    /// Batches that ended in an error after retries.
    pub failed_batches: usize,
    /// Batches never sent because the run was cancelled.
    pub cancelled_batches: usize,
}

/// What one lookup told us about one id.
#[derive(Debug, Clone)]
enum Resolution<V> {
    Found(V),
    Missing,
    Failed,
}

impl<V> Resolution<V> {
    fn status(&self) -> FetchStatus {
        match self {
            Resolution::Found(_) => FetchStatus::Ok,
            Resolution::Missing => FetchStatus::NotFound,
            Resolution::Failed => FetchStatus::Error,
        }
    }

    fn found(&self) -> Option<&V> {
        match self {
            Resolution::Found(v) => Some(v),
            Resolution::Missing | Resolution::Failed => None,
        }
    }
}

#[derive(Debug)]
enum Job {
    Comments(Vec<String>),
    Videos(Vec<String>),
}

enum BatchFailure {
    Cancelled,
    Error(YoutubeError),
}

enum BatchOutcome {
    Likes {
        ids: Vec<String>,
        result: Result<HashMap<String, u64>, BatchFailure>,
    },
    Titles {
        ids: Vec<String>,
        result: Result<HashMap<String, String>, BatchFailure>,
    },
}

/// Drives lookups for pending records through an injected [`YoutubeLookup`].
///
/// The fetcher owns the lookup (and with it the authenticated session) for
/// the whole run. Video titles resolved by earlier [`BatchFetcher::fetch`]
/// calls are remembered and never requested again.
pub struct BatchFetcher<L> {
    lookup: L,
    config: FetchConfig,
    /// Video id → title, or `None` when the API reported it missing.
    known_videos: HashMap<String, Option<String>>,
}

impl<L: YoutubeLookup> BatchFetcher<L> {
    pub fn new(lookup: L, config: FetchConfig) -> Self {
        Self {
            lookup,
            config: FetchConfig {
                batch_size: config.batch_size.max(1),
                max_concurrent_batches: config.max_concurrent_batches.max(1),
                ..config
            },
            known_videos: HashMap::new(),
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Looks up and settles every pending record in `records`.
    ///
    /// Records that are already settled are left alone and cost no requests.
    /// Never fails: batches that error out after retries, or that were never
    /// sent because `cancel` fired, settle their records as
    /// [`FetchStatus::Error`].
    pub async fn fetch(
        &mut self,
        records: &mut [CommentRecord],
        cancel: &CancellationToken,
    ) -> FetchStats {
        let pending: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_pending())
            .map(|(i, _)| i)
            .collect();
        if pending.is_empty() {
            tracing::debug!("no pending records; nothing to fetch");
            return FetchStats::default();
        }

        let (comment_ids, video_ids) = {
            let view: &[CommentRecord] = records;
            let comment_ids = distinct(pending.iter().map(|&i| view[i].comment_id.as_str()));
            let video_ids = distinct(
                pending
                    .iter()
                    .map(|&i| view[i].video_id.as_str())
                    .filter(|id| !self.known_videos.contains_key(*id)),
            );
            (comment_ids, video_ids)
        };

        let jobs = self.plan(&comment_ids, &video_ids);
        let mut stats = FetchStats {
            comment_batches: jobs
                .iter()
                .filter(|j| matches!(j, Job::Comments(_)))
                .count(),
            video_batches: jobs.iter().filter(|j| matches!(j, Job::Videos(_))).count(),
            ..FetchStats::default()
        };

        tracing::info!(
            records = pending.len(),
            comments = comment_ids.len(),
            videos = video_ids.len(),
            comment_batches = stats.comment_batches,
            video_batches = stats.video_batches,
            max_in_flight = self.config.max_concurrent_batches,
            "fetching like counts and titles"
        );

        let this = &*self;
        let outcomes: Vec<BatchOutcome> = stream::iter(jobs)
            .map(|job| this.run_job(job, cancel))
            .buffer_unordered(self.config.max_concurrent_batches)
            .collect()
            .await;

        let mut likes: HashMap<String, Resolution<u64>> = HashMap::new();
        let mut titles: HashMap<String, Resolution<String>> = HashMap::new();
        for outcome in outcomes {
            match outcome {
                BatchOutcome::Likes { ids, result } => {
                    absorb(&mut likes, ids, result, &mut stats);
                }
                BatchOutcome::Titles { ids, result } => {
                    absorb(&mut titles, ids, result, &mut stats);
                }
            }
        }

        for (id, resolution) in &titles {
            match resolution {
                Resolution::Found(title) => {
                    self.known_videos.insert(id.clone(), Some(title.clone()));
                }
                Resolution::Missing => {
                    self.known_videos.insert(id.clone(), None);
                }
                Resolution::Failed => {}
            }
        }

        for &i in &pending {
            let record = &mut records[i];
            let like = likes
                .get(&record.comment_id)
                .cloned()
                .unwrap_or(Resolution::Failed);
            let title = match titles.get(&record.video_id) {
                Some(resolution) => resolution.clone(),
                None => match self.known_videos.get(&record.video_id) {
                    Some(Some(title)) => Resolution::Found(title.clone()),
                    Some(None) => Resolution::Missing,
                    None => Resolution::Failed,
                },
            };

            let status = like.status().worst(title.status());
            record.settle(status, like.found().copied(), title.found().cloned());
        }

        tracing::info!(
            failed_batches = stats.failed_batches,
            cancelled_batches = stats.cancelled_batches,
            "fetch finished"
        );
        stats
    }

    /// Splits ids into batch jobs, titles first.
    fn plan(&self, comment_ids: &[String], video_ids: &[String]) -> Vec<Job> {
        let size = self.config.batch_size;
        video_ids
            .chunks(size)
            .map(|c| Job::Videos(c.to_vec()))
            .chain(comment_ids.chunks(size).map(|c| Job::Comments(c.to_vec())))
            .collect()
    }

    async fn run_job(&self, job: Job, cancel: &CancellationToken) -> BatchOutcome {
        match job {
            Job::Comments(ids) => {
                let label = format!("comments[{}..]", ids.first().map_or("", String::as_str));
                let result = self
                    .run_batch(&label, cancel, || self.lookup.comment_like_counts(&ids))
                    .await;
                BatchOutcome::Likes { ids, result }
            }
            Job::Videos(ids) => {
                let label = format!("videos[{}..]", ids.first().map_or("", String::as_str));
                let result = self
                    .run_batch(&label, cancel, || self.lookup.video_titles(&ids))
                    .await;
                BatchOutcome::Titles { ids, result }
            }
        }
    }

    async fn run_batch<V, F, Fut>(
        &self,
        label: &str,
        cancel: &CancellationToken,
        operation: F,
    ) -> Result<HashMap<String, V>, BatchFailure>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<HashMap<String, V>, YoutubeError>>,
    {
        if cancel.is_cancelled() {
            tracing::debug!(batch = label, "run cancelled; batch not sent");
            return Err(BatchFailure::Cancelled);
        }
        retry_with_backoff(&self.config.retry, cancel, label, operation)
            .await
            .map_err(|e| {
                tracing::warn!(batch = label, error = %e, "batch failed; its records will be marked ERROR");
                BatchFailure::Error(e)
            })
    }
}

/// Records one batch's per-id resolutions. Ids are matched exactly.
fn absorb<V>(
    into: &mut HashMap<String, Resolution<V>>,
    ids: Vec<String>,
    result: Result<HashMap<String, V>, BatchFailure>,
    stats: &mut FetchStats,
) {
    match result {
        Ok(mut found) => {
            for id in ids {
                let resolution = match found.remove(&id) {
                    Some(value) => Resolution::Found(value),
                    None => Resolution::Missing,
                };
                into.insert(id, resolution);
            }
        }
        Err(failure) => {
            match failure {
                BatchFailure::Cancelled => stats.cancelled_batches += 1,
                BatchFailure::Error(_) => stats.failed_batches += 1,
            }
            for id in ids {
                into.insert(id, Resolution::Failed);
            }
        }
    }
}

/// Distinct ids in first-seen order.
fn distinct<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "fetcher_test.rs"]
mod tests;
