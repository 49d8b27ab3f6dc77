//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the storage traits.

use crate::classify::{DocType, SourceId};
use crate::discovery::DiscoveredCandidate;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{
    DocumentStorage, QueueStorage, RunStorage, StorageError, StorageResult,
};
use crate::storage::{
    DocRecord, NewDoc, QueueEntry, QueueStatus, RunRecord, RunStatus, SourceTypeCount,
    ThemeRecord,
};
use crate::DiscoveryError;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const QUEUE_COLUMNS: &str = "id, url, source, doc_type, status, discovered_at, last_seen_at, \
     crawl_attempts, last_error";

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status, candidate_count, \
     processed_count, error";

const DOC_COLUMNS: &str = "id, url, source, doc_type, title, published_at, short_description, \
     content_text, content_hash, last_crawled_at, http_status, language";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates a database file and applies the schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(DiscoveryError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, DiscoveryError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, DiscoveryError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Direct access to the connection (for testing)
    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl QueueStorage for SqliteStorage {
    fn upsert_discovered_urls(
        &mut self,
        candidates: &[DiscoveredCandidate],
    ) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO discovered_urls
                    (url, source, doc_type, status, discovered_at, last_seen_at, crawl_attempts)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5, 0)
                 ON CONFLICT(url) DO UPDATE SET
                    source = excluded.source,
                    doc_type = excluded.doc_type,
                    last_seen_at = excluded.last_seen_at",
            )?;

            for candidate in candidates {
                stmt.execute(params![
                    candidate.url.as_str(),
                    candidate.source.to_db_string(),
                    candidate.doc_type.to_db_string(),
                    QueueStatus::Pending.to_db_string(),
                    candidate.discovered_at,
                ])?;
            }
        }
        tx.commit()?;

        Ok(candidates.len())
    }

    fn get_queue_entry(&self, url: &str) -> StorageResult<Option<QueueEntry>> {
        let sql = format!("SELECT {} FROM discovered_urls WHERE url = ?1", QUEUE_COLUMNS);
        let entry = self
            .conn
            .query_row(&sql, params![url], queue_entry_from_row)
            .optional()?;
        Ok(entry)
    }

    fn list_pending(&self, limit: usize) -> StorageResult<Vec<QueueEntry>> {
        let sql = format!(
            "SELECT {} FROM discovered_urls WHERE status = ?1
             ORDER BY discovered_at ASC, id ASC LIMIT ?2",
            QUEUE_COLUMNS
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(
                params![QueueStatus::Pending.to_db_string(), limit],
                queue_entry_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn counts_by_source_and_type(&self) -> StorageResult<Vec<SourceTypeCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT source, doc_type, COUNT(*) FROM discovered_urls
             GROUP BY source, doc_type
             ORDER BY source, doc_type",
        )?;

        let counts = stmt
            .query_map([], |row| {
                Ok(SourceTypeCount {
                    source: source_column(row, 0)?,
                    doc_type: doc_type_column(row, 1)?,
                    count: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }
}

impl RunStorage for SqliteStorage {
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO discovery_runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![Utc::now(), config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM discovery_runs WHERE id = ?1", RUN_COLUMNS);
        self.conn
            .query_row(&sql, params![run_id], run_from_row)
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("run {}", run_id)))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let sql = format!(
            "SELECT {} FROM discovery_runs ORDER BY id DESC LIMIT 1",
            RUN_COLUMNS
        );
        let run = self.conn.query_row(&sql, [], run_from_row).optional()?;
        Ok(run)
    }

    fn complete_run(
        &mut self,
        run_id: i64,
        candidate_count: usize,
        processed_count: usize,
    ) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE discovery_runs
             SET status = ?1, finished_at = ?2, candidate_count = ?3, processed_count = ?4
             WHERE id = ?5",
            params![
                RunStatus::Completed.to_db_string(),
                Utc::now(),
                candidate_count as i64,
                processed_count as i64,
                run_id
            ],
        )?;
        require_updated(updated, run_id)
    }

    fn fail_run(&mut self, run_id: i64, error: &str) -> StorageResult<()> {
        let updated = self.conn.execute(
            "UPDATE discovery_runs SET status = ?1, finished_at = ?2, error = ?3 WHERE id = ?4",
            params![RunStatus::Failed.to_db_string(), Utc::now(), error, run_id],
        )?;
        require_updated(updated, run_id)
    }
}

impl DocumentStorage for SqliteStorage {
    fn create_doc(&mut self, doc: &NewDoc) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO docs (url, source, doc_type, title, published_at, short_description,
                content_text, content_hash, last_crawled_at, http_status, language)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                doc.url,
                doc.source.to_db_string(),
                doc.doc_type.to_db_string(),
                doc.title,
                doc.published_at,
                doc.short_description,
                doc.content_text,
                doc.content_hash,
                doc.last_crawled_at,
                doc.http_status,
                doc.language,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_doc_by_url(&self, url: &str) -> StorageResult<Option<DocRecord>> {
        let sql = format!("SELECT {} FROM docs WHERE url = ?1", DOC_COLUMNS);
        let doc = self
            .conn
            .query_row(&sql, params![url], doc_from_row)
            .optional()?;
        Ok(doc)
    }

    fn delete_doc(&mut self, doc_id: i64) -> StorageResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM docs WHERE id = ?1", params![doc_id])?;
        Ok(deleted > 0)
    }

    fn create_theme(&mut self, theme: &str, description: Option<&str>) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO themes (theme, description, updated_at) VALUES (?1, ?2, ?3)",
            params![theme, description, Utc::now()],
        )?;
        Ok(())
    }

    fn delete_theme(&mut self, theme: &str) -> StorageResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM themes WHERE theme = ?1", params![theme])?;
        Ok(deleted > 0)
    }

    fn link_doc_theme(&mut self, doc_id: i64, theme: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO doc_themes (doc_id, theme) VALUES (?1, ?2)",
            params![doc_id, theme],
        )?;
        Ok(())
    }

    fn themes_for_doc(&self, doc_id: i64) -> StorageResult<Vec<ThemeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.theme, t.description, t.updated_at
             FROM themes t
             JOIN doc_themes dt ON dt.theme = t.theme
             WHERE dt.doc_id = ?1
             ORDER BY t.theme",
        )?;

        let themes = stmt
            .query_map(params![doc_id], |row| {
                Ok(ThemeRecord {
                    theme: row.get(0)?,
                    description: row.get(1)?,
                    updated_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(themes)
    }
}

fn require_updated(updated: usize, run_id: i64) -> StorageResult<()> {
    if updated == 0 {
        return Err(StorageError::NotFound(format!("run {}", run_id)));
    }
    Ok(())
}

fn invalid_column(idx: usize, column: &str, value: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(StorageError::InvalidValue {
            column: column.to_string(),
            value,
        }),
    )
}

fn source_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<SourceId> {
    let value: String = row.get(idx)?;
    SourceId::from_db_string(&value).ok_or_else(|| invalid_column(idx, "source", value))
}

fn doc_type_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DocType> {
    let value: String = row.get(idx)?;
    Ok(DocType::from_db_string_lossy(&value))
}

fn queue_entry_from_row(row: &Row<'_>) -> rusqlite::Result<QueueEntry> {
    let status: String = row.get(4)?;
    let status =
        QueueStatus::from_db_string(&status).ok_or_else(|| invalid_column(4, "status", status))?;

    Ok(QueueEntry {
        id: row.get(0)?,
        url: row.get(1)?,
        source: source_column(row, 2)?,
        doc_type: doc_type_column(row, 3)?,
        status,
        discovered_at: row.get(5)?,
        last_seen_at: row.get(6)?,
        crawl_attempts: row.get(7)?,
        last_error: row.get(8)?,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    let status: String = row.get(4)?;
    let status =
        RunStatus::from_db_string(&status).ok_or_else(|| invalid_column(4, "status", status))?;

    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status,
        candidate_count: row.get::<_, Option<i64>>(5)?.map(|n| n as u64),
        processed_count: row.get::<_, Option<i64>>(6)?.map(|n| n as u64),
        error: row.get(7)?,
    })
}

fn doc_from_row(row: &Row<'_>) -> rusqlite::Result<DocRecord> {
    Ok(DocRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        source: source_column(row, 2)?,
        doc_type: doc_type_column(row, 3)?,
        title: row.get(4)?,
        published_at: row.get(5)?,
        short_description: row.get(6)?,
        content_text: row.get(7)?,
        content_hash: row.get(8)?,
        last_crawled_at: row.get(9)?,
        http_status: row.get(10)?,
        language: row.get(11)?,
    })
}
