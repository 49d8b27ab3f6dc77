//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the discovery database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track discovery runs
CREATE TABLE IF NOT EXISTS discovery_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('running', 'completed', 'failed')),
    candidate_count INTEGER,
    processed_count INTEGER,
    error TEXT
);

-- Crawl queue fed by sitemap discovery
CREATE TABLE IF NOT EXISTS discovered_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    source TEXT NOT NULL CHECK (source IN ('jetformbuilder', 'crocoblock')),
    doc_type TEXT NOT NULL CHECK (doc_type IN ('tutorial', 'blog', 'kb', 'docs', 'unknown')),
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'processing', 'crawled', 'failed')),
    discovered_at TEXT NOT NULL,
    last_seen_at TEXT NOT NULL,
    crawl_attempts INTEGER NOT NULL DEFAULT 0 CHECK (crawl_attempts >= 0),
    last_error TEXT
);

CREATE INDEX IF NOT EXISTS idx_discovered_urls_status_discovered_at
    ON discovered_urls(status, discovered_at);

-- Finalized documents
CREATE TABLE IF NOT EXISTS docs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    source TEXT NOT NULL CHECK (source IN ('jetformbuilder', 'crocoblock')),
    doc_type TEXT NOT NULL CHECK (doc_type IN ('tutorial', 'blog', 'kb', 'docs', 'unknown')),
    title TEXT NOT NULL,
    published_at TEXT,
    short_description TEXT,
    content_text TEXT,
    content_hash TEXT,
    last_crawled_at TEXT,
    http_status INTEGER,
    language TEXT NOT NULL DEFAULT 'en'
);

CREATE INDEX IF NOT EXISTS idx_docs_source ON docs(source);
CREATE INDEX IF NOT EXISTS idx_docs_type ON docs(doc_type);
CREATE INDEX IF NOT EXISTS idx_docs_published_at ON docs(published_at DESC);

CREATE TABLE IF NOT EXISTS themes (
    theme TEXT PRIMARY KEY,
    description TEXT,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS doc_themes (
    doc_id INTEGER NOT NULL REFERENCES docs(id) ON DELETE CASCADE,
    theme TEXT NOT NULL REFERENCES themes(theme) ON DELETE CASCADE,
    PRIMARY KEY (doc_id, theme)
);

CREATE INDEX IF NOT EXISTS idx_doc_themes_theme ON doc_themes(theme);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
