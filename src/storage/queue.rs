//! Queue reconciliation
//!
//! Merges a discovery run's candidates into the persistent crawl queue.

use crate::discovery::DiscoveredCandidate;
use crate::storage::traits::QueueStorage;
use crate::Result;

/// Enqueues discovered candidates with upsert semantics
///
/// An empty batch returns `0` without touching storage. Otherwise the whole
/// batch is handed to [`QueueStorage::upsert_discovered_urls`] and applied
/// atomically.
///
/// # Returns
///
/// The number of candidates processed
pub fn enqueue_candidates<S>(store: &mut S, candidates: &[DiscoveredCandidate]) -> Result<usize>
where
    S: QueueStorage + ?Sized,
{
    if candidates.is_empty() {
        tracing::debug!("No candidates to enqueue");
        return Ok(0);
    }

    let processed = store.upsert_discovered_urls(candidates)?;
    tracing::info!("Enqueued {} candidates", processed);
    Ok(processed)
}
