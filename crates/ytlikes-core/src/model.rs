//! Comment records and the per-run summary counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of looking up a comment and its video against the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchStatus {
    Pending,
    Ok,
    NotFound,
    Error,
}

impl FetchStatus {
    /// Severity used when a record depends on more than one lookup:
    /// the worse outcome wins.
    #[must_use]
    pub fn severity(self) -> u8 {
        match self {
            FetchStatus::Pending => 0,
            FetchStatus::Ok => 1,
            FetchStatus::NotFound => 2,
            FetchStatus::Error => 3,
        }
    }

    /// Returns whichever of `self` and `other` is more severe.
    #[must_use]
    pub fn worst(self, other: FetchStatus) -> FetchStatus {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStatus::Pending => write!(f, "PENDING"),
            FetchStatus::Ok => write!(f, "OK"),
            FetchStatus::NotFound => write!(f, "NOT_FOUND"),
            FetchStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// One exported comment, enriched in place by the fetch stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub comment_id: String,
    pub video_id: String,
    pub comment_text: String,
    /// Creation time from the export. `None` when missing or unparseable.
    pub timestamp: Option<DateTime<Utc>>,
    /// `None` until fetched.
    pub like_count: Option<u64>,
    /// `None` until fetched; set to `video_id` when no title is available.
    pub video_title: Option<String>,
    pub fetch_status: FetchStatus,
}

impl CommentRecord {
    /// Creates a record in the [`FetchStatus::Pending`] state.
    #[must_use]
    pub fn new(
        comment_id: impl Into<String>,
        video_id: impl Into<String>,
        comment_text: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            comment_id: comment_id.into(),
            video_id: video_id.into(),
            comment_text: comment_text.into(),
            timestamp,
            like_count: None,
            video_title: None,
            fetch_status: FetchStatus::Pending,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.fetch_status == FetchStatus::Pending
    }

    /// Records the outcome of the fetch stage.
    ///
    /// Settles at most once: calls on a record that is no longer pending are
    /// ignored and return `false`. A non-OK status always carries a zero like
    /// count, and a missing title falls back to the video id.
    pub fn settle(
        &mut self,
        status: FetchStatus,
        like_count: Option<u64>,
        video_title: Option<String>,
    ) -> bool {
        if !self.is_pending() || status == FetchStatus::Pending {
            return false;
        }
        self.fetch_status = status;
        self.like_count = Some(match status {
            FetchStatus::Ok => like_count.unwrap_or(0),
            _ => 0,
        });
        self.video_title = Some(video_title.unwrap_or_else(|| self.video_id.clone()));
        true
    }

    /// Like count used for ranking; unfetched records count as zero.
    #[must_use]
    pub fn likes(&self) -> u64 {
        self.like_count.unwrap_or(0)
    }

    #[must_use]
    pub fn title_or_fallback(&self) -> &str {
        self.video_title.as_deref().unwrap_or(&self.video_id)
    }

    #[must_use]
    pub fn video_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// Counters reported alongside every run so no row goes unaccounted for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Non-empty data rows read from the export.
    pub total_rows: usize,
    /// Records produced after skips and deduplication.
    pub parsed: usize,
    /// Rows dropped as malformed or incomplete.
    pub skipped: usize,
    /// Rows folded into a later row with the same comment id.
    pub duplicates: usize,
    pub fetch_ok: usize,
    pub fetch_not_found: usize,
    pub fetch_error: usize,
}

impl RunSummary {
    /// Tallies fetch outcomes for `records`, leaving the parse counters untouched.
    pub fn count_statuses<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a CommentRecord>,
    {
        self.fetch_ok = 0;
        self.fetch_not_found = 0;
        self.fetch_error = 0;
        for record in records {
            match record.fetch_status {
                FetchStatus::Ok => self.fetch_ok += 1,
                FetchStatus::NotFound => self.fetch_not_found += 1,
                FetchStatus::Error => self.fetch_error += 1,
                FetchStatus::Pending => {}
            }
        }
    }

    /// Records still pending after the fetch stage; zero after a completed run.
    #[must_use]
    pub fn unsettled(&self) -> usize {
        self.parsed
            .saturating_sub(self.fetch_ok + self.fetch_not_found + self.fetch_error)
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows: {} parsed, {} skipped, {} duplicates | fetch: {} ok, {} not found, {} error",
            self.total_rows,
            self.parsed,
            self.skipped,
            self.duplicates,
            self.fetch_ok,
            self.fetch_not_found,
            self.fetch_error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> CommentRecord {
        CommentRecord::new(id, "dQw4w9WgXcQ", "hello", None)
    }

    #[test]
    fn new_record_is_pending_with_no_metrics() {
        let r = record("A");
        assert!(r.is_pending());
        assert_eq!(r.like_count, None);
        assert_eq!(r.video_title, None);
        assert_eq!(r.likes(), 0);
    }

    #[test]
    fn settle_ok_sets_metrics() {
        let mut r = record("A");
        assert!(r.settle(FetchStatus::Ok, Some(12), Some("Title".to_owned())));
        assert_eq!(r.fetch_status, FetchStatus::Ok);
        assert_eq!(r.like_count, Some(12));
        assert_eq!(r.video_title.as_deref(), Some("Title"));
    }

    #[test]
    fn settle_happens_only_once() {
        let mut r = record("A");
        assert!(r.settle(FetchStatus::Ok, Some(3), None));
        assert!(!r.settle(FetchStatus::Error, None, None));
        assert_eq!(r.fetch_status, FetchStatus::Ok);
        assert_eq!(r.like_count, Some(3));
    }

    #[test]
    fn settle_rejects_pending_target() {
        let mut r = record("A");
        assert!(!r.settle(FetchStatus::Pending, Some(1), None));
        assert!(r.is_pending());
    }

    #[test]
    fn non_ok_status_zeroes_likes_and_falls_back_to_video_id() {
        let mut r = record("A");
        r.settle(FetchStatus::Error, Some(40), None);
        assert_eq!(r.like_count, Some(0));
        assert_eq!(r.video_title.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(r.title_or_fallback(), "dQw4w9WgXcQ");
    }

    #[test]
    fn worst_status_prefers_error() {
        assert_eq!(
            FetchStatus::Ok.worst(FetchStatus::NotFound),
            FetchStatus::NotFound
        );
        assert_eq!(
            FetchStatus::NotFound.worst(FetchStatus::Error),
            FetchStatus::Error
        );
        assert_eq!(FetchStatus::Error.worst(FetchStatus::Ok), FetchStatus::Error);
    }

    #[test]
    fn status_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&FetchStatus::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
        assert_eq!(FetchStatus::NotFound.to_string(), "NOT_FOUND");
    }

    #[test]
    fn video_url_uses_watch_link() {
        assert_eq!(
            record("A").video_url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn summary_counts_statuses() {
        let mut ok = record("A");
        ok.settle(FetchStatus::Ok, Some(1), None);
        let mut missing = record("B");
        missing.settle(FetchStatus::NotFound, None, None);
        let mut failed = record("C");
        failed.settle(FetchStatus::Error, None, None);

        let mut summary = RunSummary {
            parsed: 3,
            ..RunSummary::default()
        };
        summary.count_statuses([&ok, &missing, &failed]);
        assert_eq!(summary.fetch_ok, 1);
        assert_eq!(summary.fetch_not_found, 1);
        assert_eq!(summary.fetch_error, 1);
        assert_eq!(summary.unsettled(), 0);
    }
}
