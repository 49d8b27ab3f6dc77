//! URL handling module
//!
//! This module provides URL canonicalization and host pattern matching.
//! Canonical URLs are the identity key for everything downstream: sitemap
//! cycle detection, per-run deduplication and the crawl queue.

mod matcher;
mod normalize;

pub use matcher::matches_domain;
pub use normalize::{normalize_url, try_normalize_url, CanonicalUrl};
