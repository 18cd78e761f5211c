//! Enrichment stage: batched like-count and title lookups, merge, and ranking.
//!
//! [`BatchFetcher`] groups pending records by comment and video id, issues
//! bounded-size lookups with bounded concurrency and retry, and settles every
//! record exactly once. [`rank`] then orders the settled records for the
//! report. [`run_enrichment`] runs both and produces the summary counters.

pub mod fetcher;
pub mod pipeline;
pub mod rank;
pub mod retry;

pub use fetcher::{BatchFetcher, FetchConfig, FetchStats};
pub use pipeline::{run_enrichment, EnrichmentReport};
pub use rank::{rank, RankedComments};
pub use retry::RetryPolicy;
pub use tokio_util::sync::CancellationToken;
