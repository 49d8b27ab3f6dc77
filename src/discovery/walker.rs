//! Breadth-first sitemap tree walker
//!
//! Starting from a root sitemap URL, the walker follows sitemap-index entries
//! level by level and collects the page URLs of every urlset it reaches.
//! Sitemaps are visited at most once per walk, keyed on their canonical URL,
//! so self-referencing or cross-referencing indexes cannot loop.

use crate::discovery::fetcher::FetchContent;
use crate::discovery::parser::{parse_sitemap, SitemapKind};
use crate::url::{normalize_url, CanonicalUrl};
use crate::{DiscoveryError, Result};
use flate2::read::GzDecoder;
use std::collections::{HashSet, VecDeque};
use std::io::Read;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Walks a sitemap tree and returns its page URLs
///
/// Page URLs are canonicalized, deduplicated and returned in first-seen
/// order. Locations that fail canonicalization are skipped.
///
/// # Errors
///
/// A fetch, decompression or XML parse failure on any sitemap in the tree
/// aborts the walk with that error. Documents whose root is neither
/// `sitemapindex` nor `urlset` are not errors; they contribute nothing.
pub async fn walk_sitemap_tree<F: FetchContent>(
    root_sitemap_url: &str,
    fetcher: &F,
) -> Result<Vec<CanonicalUrl>> {
    let mut queue: VecDeque<CanonicalUrl> = VecDeque::new();
    let mut visited_sitemaps: HashSet<CanonicalUrl> = HashSet::new();
    let mut seen_pages: HashSet<CanonicalUrl> = HashSet::new();
    let mut pages = Vec::new();

    match normalize_url(root_sitemap_url) {
        Some(root) => queue.push_back(root),
        None => tracing::warn!("Skipping invalid root sitemap URL: {}", root_sitemap_url),
    }

    while let Some(sitemap_url) = queue.pop_front() {
        if !visited_sitemaps.insert(sitemap_url.clone()) {
            tracing::debug!("Already visited {}", sitemap_url);
            continue;
        }

        let raw = fetcher.fetch(sitemap_url.as_str()).await?;
        let xml = maybe_decompress(&sitemap_url, raw)?;
        let document = parse_sitemap(&xml).map_err(|message| DiscoveryError::Parse {
            url: sitemap_url.to_string(),
            message,
        })?;

        match document.kind {
            SitemapKind::Index => {
                tracing::debug!(
                    "Sitemap index {} lists {} sitemaps",
                    sitemap_url,
                    document.locations.len()
                );
                for loc in document.locations {
                    match normalize_url(&loc) {
                        Some(child) => queue.push_back(child),
                        None => tracing::warn!("Skipping invalid sitemap location: {}", loc),
                    }
                }
            }
            SitemapKind::UrlSet => {
                let before = pages.len();
                for loc in document.locations {
                    let Some(page) = normalize_url(&loc) else {
                        tracing::warn!("Skipping invalid page location: {}", loc);
                        continue;
                    };
                    if seen_pages.insert(page.clone()) {
                        pages.push(page);
                    }
                }
                tracing::debug!(
                    "Urlset {} added {} new pages",
                    sitemap_url,
                    pages.len() - before
                );
            }
            SitemapKind::Other(root) => {
                tracing::debug!("Ignoring {}: unexpected root element <{}>", sitemap_url, root);
            }
        }
    }

    tracing::info!(
        "Walked {} sitemaps from {}, found {} pages",
        visited_sitemaps.len(),
        root_sitemap_url,
        pages.len()
    );

    Ok(pages)
}

/// Gunzips `.gz` sitemaps
///
/// Payloads without the gzip magic bytes are passed through unchanged, as
/// the HTTP layer may already have decoded a gzip content encoding.
fn maybe_decompress(url: &CanonicalUrl, raw: Vec<u8>) -> Result<Vec<u8>> {
    if !url.path().to_ascii_lowercase().ends_with(".gz") || !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw);
    }

    let mut xml = Vec::new();
    GzDecoder::new(raw.as_slice())
        .read_to_end(&mut xml)
        .map_err(|source| DiscoveryError::Decompress {
            url: url.to_string(),
            source,
        })?;
    Ok(xml)
}
