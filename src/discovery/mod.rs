//! Sitemap discovery
//!
//! This module turns configured sitemap roots into classified candidate pages:
//!
//! - **Fetching**: the [`FetchContent`] capability and its HTTP implementation
//! - **Parsing**: sitemap index and urlset documents
//! - **Walking**: breadth-first traversal of one sitemap tree
//! - **Orchestration**: per-source walks, classification and run-wide dedup

mod fetcher;
mod orchestrator;
mod parser;
mod walker;

pub use fetcher::{build_http_client, FetchContent, HttpFetcher};
pub use orchestrator::{discover_candidates, discover_now, DiscoveredCandidate};
pub use parser::{parse_sitemap, SitemapDocument, SitemapKind};
pub use walker::walk_sitemap_tree;
