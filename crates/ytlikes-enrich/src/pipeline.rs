//! Fetch-then-rank orchestration for one run.

use tokio_util::sync::CancellationToken;
use ytlikes_core::{CommentRecord, RunSummary};
use ytlikes_youtube::YoutubeLookup;

use crate::fetcher::{BatchFetcher, FetchStats};
use crate::rank::{rank, RankedComments};

/// Everything the report emitter needs from a run.
#[derive(Debug, Clone)]
pub struct EnrichmentReport {
    pub ranked: RankedComments,
    pub summary: RunSummary,
    pub stats: FetchStats,
}

/// Fetches metrics for `records`, ranks them, and completes `summary`.
///
/// `summary` is expected to carry the parse counters; the fetch counters are
/// filled in here. Per-batch failures and cancellation degrade individual
/// records and never fail the run.
pub async fn run_enrichment<L: YoutubeLookup>(
    fetcher: &mut BatchFetcher<L>,
    mut records: Vec<CommentRecord>,
    mut summary: RunSummary,
    cancel: &CancellationToken,
) -> EnrichmentReport {
    let stats = fetcher.fetch(&mut records, cancel).await;

    summary.parsed = records.len();
    summary.count_statuses(&records);
    if summary.unsettled() > 0 {
        tracing::warn!(
            unsettled = summary.unsettled(),
            "some records were never settled"
        );
    }

    let ranked = rank(records);
    tracing::info!(%summary, "enrichment complete");

    EnrichmentReport {
        ranked,
        summary,
        stats,
    }
}
