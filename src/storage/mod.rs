//! Storage module for the discovery queue
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - The `discovered_urls` crawl queue and its upsert reconciliation
//! - The discovery run ledger
//! - Finalized documents and their themes

mod queue;
mod schema;
mod sqlite;
mod traits;

pub use queue::enqueue_candidates;
pub use sqlite::SqliteStorage;
pub use traits::{DocumentStorage, QueueStorage, RunStorage, StorageError, StorageResult};

use crate::classify::{DocType, SourceId};
use crate::DiscoveryError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Opens or creates the discovery database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(DiscoveryError)` - Failed to open the database or apply the schema
pub fn open_storage(path: &Path) -> Result<SqliteStorage, DiscoveryError> {
    SqliteStorage::new(path)
}

/// Crawl state of a queue entry
///
/// Discovery only ever writes `Pending`; the other states belong to the
/// downstream crawler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueStatus {
    Pending,
    Processing,
    Crawled,
    Failed,
}

impl QueueStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Crawled => "crawled",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "crawled" => Some(Self::Crawled),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A row of the `discovered_urls` queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: i64,
    pub url: String,
    pub source: SourceId,
    pub doc_type: DocType,
    pub status: QueueStatus,
    /// Set on first insert, never changed by rediscovery
    pub discovered_at: DateTime<Utc>,
    /// Refreshed on every rediscovery
    pub last_seen_at: DateTime<Utc>,
    pub crawl_attempts: u32,
    pub last_error: Option<String>,
}

/// Queue size for one (source, doc type) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTypeCount {
    pub source: SourceId,
    #[serde(rename = "type")]
    pub doc_type: DocType,
    pub count: u64,
}

/// Represents a discovery run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config_hash: String,
    pub status: RunStatus,
    pub candidate_count: Option<u64>,
    pub processed_count: Option<u64>,
    pub error: Option<String>,
}

/// Status of a discovery run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A finalized document to insert into `docs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoc {
    pub url: String,
    pub source: SourceId,
    pub doc_type: DocType,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub short_description: Option<String>,
    pub content_text: Option<String>,
    pub content_hash: Option<String>,
    pub last_crawled_at: Option<DateTime<Utc>>,
    pub http_status: Option<u16>,
    pub language: String,
}

impl NewDoc {
    /// A document with only its required fields set and language `en`
    pub fn new(
        url: impl Into<String>,
        source: SourceId,
        doc_type: DocType,
        title: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            source,
            doc_type,
            title: title.into(),
            published_at: None,
            short_description: None,
            content_text: None,
            content_hash: None,
            last_crawled_at: None,
            http_status: None,
            language: "en".to_string(),
        }
    }
}

/// A row of `docs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRecord {
    pub id: i64,
    pub url: String,
    pub source: SourceId,
    pub doc_type: DocType,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub short_description: Option<String>,
    pub content_text: Option<String>,
    pub content_hash: Option<String>,
    pub last_crawled_at: Option<DateTime<Utc>>,
    pub http_status: Option<u16>,
    pub language: String,
}

/// A row of `themes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRecord {
    pub theme: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}
