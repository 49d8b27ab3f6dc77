//! Discovery run pipeline
//!
//! Ties configuration, discovery, queue reconciliation and the run ledger
//! together for one run-to-completion invocation.

use crate::config::{compute_config_hash, Config};
use crate::discovery::{discover_now, FetchContent, HttpFetcher};
use crate::storage::{
    enqueue_candidates, open_storage, QueueStorage, RunStorage, SourceTypeCount,
};
use crate::{DiscoveryError, Result};
use serde::Serialize;
use std::path::Path;

const SUMMARY_EVENT: &str = "url_discovery_summary";
const FAILURE_EVENT: &str = "url_discovery_failed";

/// Aggregate record printed after a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoverySummary {
    pub event: &'static str,
    pub candidate_count: usize,
    pub processed_count: usize,
    pub counts_by_source_type: Vec<SourceTypeCount>,
}

impl DiscoverySummary {
    pub fn new(
        candidate_count: usize,
        processed_count: usize,
        counts_by_source_type: Vec<SourceTypeCount>,
    ) -> Self {
        Self {
            event: SUMMARY_EVENT,
            candidate_count,
            processed_count,
            counts_by_source_type,
        }
    }
}

/// Structured record describing a failed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub event: &'static str,
    pub error_type: &'static str,
    pub error: String,
}

impl From<&DiscoveryError> for FailureRecord {
    fn from(error: &DiscoveryError) -> Self {
        Self {
            event: FAILURE_EVENT,
            error_type: error.kind(),
            error: error.to_string(),
        }
    }
}

impl FailureRecord {
    /// Renders the record as the single stderr line of a failed run
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"event":"{}","error_type":"{}","error":"{}"}}"#,
                self.event,
                self.error_type,
                self.error.escape_default()
            )
        })
    }
}

/// Runs discovery against the configured database over HTTP
pub async fn run(config: &Config) -> Result<DiscoverySummary> {
    let fetcher = HttpFetcher::new(&config.fetcher)?;
    let mut storage = open_storage(Path::new(&config.output.database_path))?;
    run_discovery(config, &fetcher, &mut storage).await
}

/// Runs discovery with an injected fetcher and store
///
/// The run is recorded in the ledger before any fetch. On success it is
/// completed with its counts; on failure it is marked failed with the error
/// message and the original error is returned.
pub async fn run_discovery<F, S>(
    config: &Config,
    fetcher: &F,
    storage: &mut S,
) -> Result<DiscoverySummary>
where
    F: FetchContent,
    S: QueueStorage + RunStorage,
{
    let config_hash = compute_config_hash(config);
    let run_id = storage.create_run(&config_hash)?;
    tracing::info!("Started discovery run {} (config {})", run_id, config_hash);

    let outcome = execute(config, fetcher, storage).await;
    match outcome {
        Ok(summary) => {
            storage.complete_run(run_id, summary.candidate_count, summary.processed_count)?;
            tracing::info!(
                "Run {} completed: {} candidates, {} processed",
                run_id,
                summary.candidate_count,
                summary.processed_count
            );
            Ok(summary)
        }
        Err(e) => {
            if let Err(ledger_error) = storage.fail_run(run_id, &e.to_string()) {
                tracing::warn!("Could not mark run {} as failed: {}", run_id, ledger_error);
            }
            Err(e)
        }
    }
}

async fn execute<F, S>(config: &Config, fetcher: &F, storage: &mut S) -> Result<DiscoverySummary>
where
    F: FetchContent,
    S: QueueStorage,
{
    let candidates = discover_now(&config.sources, fetcher).await?;
    let processed = enqueue_candidates(storage, &candidates)?;
    let counts = storage.counts_by_source_and_type()?;

    Ok(DiscoverySummary::new(candidates.len(), processed, counts))
}
