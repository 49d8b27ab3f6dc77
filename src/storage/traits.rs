//! Storage traits and error types
//!
//! This module defines the trait interfaces for storage backends and
//! associated error types.

use crate::discovery::DiscoveredCandidate;
use crate::storage::{DocRecord, NewDoc, QueueEntry, RunRecord, SourceTypeCount, ThemeRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid value '{value}' in column {column}")]
    InvalidValue { column: String, value: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// The persistent crawl queue
pub trait QueueStorage {
    /// Merges discovered candidates into the queue
    ///
    /// New URLs are inserted as pending with zero crawl attempts. Known URLs
    /// get their source, doc type and last-seen time overwritten; their
    /// status, attempts, first-discovery time and last error are kept.
    /// The batch is applied atomically.
    ///
    /// # Returns
    ///
    /// The number of candidates processed
    fn upsert_discovered_urls(&mut self, candidates: &[DiscoveredCandidate])
        -> StorageResult<usize>;

    /// Gets a queue entry by its canonical URL
    fn get_queue_entry(&self, url: &str) -> StorageResult<Option<QueueEntry>>;

    /// Lists up to `limit` pending entries, oldest discovery first
    fn list_pending(&self, limit: usize) -> StorageResult<Vec<QueueEntry>>;

    /// Counts queue entries per (source, doc type), ordered by source then type
    fn counts_by_source_and_type(&self) -> StorageResult<Vec<SourceTypeCount>>;
}

/// The discovery run ledger
pub trait RunStorage {
    /// Creates a new run in the `running` state
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Fingerprint of the effective configuration
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as completed with its counts and a finish timestamp
    fn complete_run(
        &mut self,
        run_id: i64,
        candidate_count: usize,
        processed_count: usize,
    ) -> StorageResult<()>;

    /// Marks a run as failed with the error message and a finish timestamp
    fn fail_run(&mut self, run_id: i64, error: &str) -> StorageResult<()>;
}

/// Finalized documents and their themes
pub trait DocumentStorage {
    /// Inserts a document, returning its ID. Fails if the URL already exists.
    fn create_doc(&mut self, doc: &NewDoc) -> StorageResult<i64>;

    fn get_doc_by_url(&self, url: &str) -> StorageResult<Option<DocRecord>>;

    /// Deletes a document and its theme links. Returns whether a row was removed.
    fn delete_doc(&mut self, doc_id: i64) -> StorageResult<bool>;

    /// Inserts a theme. Fails if the theme already exists.
    fn create_theme(&mut self, theme: &str, description: Option<&str>) -> StorageResult<()>;

    /// Deletes a theme and its document links. Returns whether a row was removed.
    fn delete_theme(&mut self, theme: &str) -> StorageResult<bool>;

    fn link_doc_theme(&mut self, doc_id: i64, theme: &str) -> StorageResult<()>;

    /// Themes linked to a document, ordered by name
    fn themes_for_doc(&self, doc_id: i64) -> StorageResult<Vec<ThemeRecord>>;
}
