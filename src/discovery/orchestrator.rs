//! Discovery orchestration across configured sources
//!
//! Runs the sitemap walker once per configured source, classifies every page
//! it returns, and deduplicates across the whole run so each canonical URL
//! yields exactly one candidate.

use crate::classify::{infer_doc_type, infer_source, DocType, SourceId};
use crate::config::SourceConfig;
use crate::discovery::fetcher::FetchContent;
use crate::discovery::walker::walk_sitemap_tree;
use crate::url::CanonicalUrl;
use crate::Result;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// A page found during a discovery run, ready to be reconciled into the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredCandidate {
    pub url: CanonicalUrl,
    pub source: SourceId,
    pub doc_type: DocType,
    pub discovered_at: DateTime<Utc>,
}

/// Discovers candidate pages for every configured source
///
/// # Behaviour
///
/// 1. Every config's `source` must be a known [`SourceId`]; otherwise the call
///    fails with a configuration error before any sitemap is fetched
/// 2. Sources are walked in input order
/// 3. A page already claimed earlier in the run is skipped, so the first
///    source to reach a URL keeps it
/// 4. The owning source is inferred from the host, falling back to the
///    config's declared source; the doc type is inferred from the path
/// 5. Every candidate is stamped with `now`
///
/// # Errors
///
/// Configuration errors, and any fetch or parse error from a walk.
pub async fn discover_candidates<F: FetchContent>(
    configs: &[SourceConfig],
    fetcher: &F,
    now: DateTime<Utc>,
) -> Result<Vec<DiscoveredCandidate>> {
    let declared: Vec<SourceId> = configs
        .iter()
        .map(|config| config.source.parse::<SourceId>())
        .collect::<std::result::Result<_, _>>()?;

    let mut seen_urls: HashSet<CanonicalUrl> = HashSet::new();
    let mut candidates = Vec::new();

    for (config, declared_source) in configs.iter().zip(declared) {
        tracing::info!(
            "Discovering {} from {}",
            declared_source,
            config.sitemap_url
        );

        let pages = walk_sitemap_tree(&config.sitemap_url, fetcher).await?;
        let before = candidates.len();

        for url in pages {
            if seen_urls.contains(&url) {
                continue;
            }

            let source = infer_source(&url).unwrap_or(declared_source);
            let doc_type = infer_doc_type(&url);

            seen_urls.insert(url.clone());
            candidates.push(DiscoveredCandidate {
                url,
                source,
                doc_type,
                discovered_at: now,
            });
        }

        tracing::info!(
            "{}: {} new candidates",
            declared_source,
            candidates.len() - before
        );
    }

    Ok(candidates)
}

/// [`discover_candidates`] stamped with the current time
pub async fn discover_now<F: FetchContent>(
    configs: &[SourceConfig],
    fetcher: &F,
) -> Result<Vec<DiscoveredCandidate>> {
    discover_candidates(configs, fetcher, Utc::now()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, DiscoveryError, FetchError};
    use chrono::TimeZone;
    use std::cell::Cell;
    use std::collections::HashMap;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 18, 0, 0, 0).unwrap()
    }

    fn stub(
        payloads: HashMap<&'static str, &'static [u8]>,
    ) -> impl Fn(&str) -> std::result::Result<Vec<u8>, FetchError> {
        move |url: &str| {
            payloads
                .get(url)
                .map(|body| body.to_vec())
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn pairs(candidates: &[DiscoveredCandidate]) -> Vec<(SourceId, DocType)> {
        candidates.iter().map(|c| (c.source, c.doc_type)).collect()
    }

    #[tokio::test]
    async fn test_nested_sitemaps_are_parsed_and_deduplicated() {
        let index: &[u8] = br#"<?xml version="1.0"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
<sitemap><loc>https://jetformbuilder.com/post-sitemap.xml</loc></sitemap>
</sitemapindex>"#;
        let urlset: &[u8] = br#"<?xml version="1.0"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
<url><loc>https://jetformbuilder.com/tutorials/example/?utm_source=test</loc></url>
<url><loc>https://jetformbuilder.com/tutorials/example/</loc></url>
<url><loc>https://jetformbuilder.com/blog/example/#heading</loc></url>
</urlset>"#;
        let fetcher = stub(HashMap::from([
            ("https://jetformbuilder.com/sitemap_index.xml", index),
            ("https://jetformbuilder.com/post-sitemap.xml", urlset),
        ]));

        let candidates = discover_candidates(
            &[SourceConfig::new(
                "jetformbuilder",
                "https://jetformbuilder.com/sitemap_index.xml",
            )],
            &fetcher,
            fixed_now(),
        )
        .await
        .unwrap();

        let urls: Vec<&str> = candidates.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://jetformbuilder.com/tutorials/example",
                "https://jetformbuilder.com/blog/example",
            ]
        );
        assert_eq!(
            pairs(&candidates),
            vec![
                (SourceId::Jetformbuilder, DocType::Tutorial),
                (SourceId::Jetformbuilder, DocType::Blog),
            ]
        );
        assert!(candidates.iter().all(|c| c.discovered_at == fixed_now()));
    }

    #[tokio::test]
    async fn test_collects_rows_per_configured_source() {
        let jet: &[u8] = br#"<urlset><url><loc>https://jetformbuilder.com/tutorials/one</loc></url></urlset>"#;
        let croco: &[u8] = br#"<urlset><url><loc>https://crocoblock.com/blog/two</loc></url></urlset>"#;
        let fetcher = stub(HashMap::from([
            ("https://jetformbuilder.com/sitemap_index.xml", jet),
            ("https://crocoblock.com/sitemap_index.xml", croco),
        ]));

        let candidates = discover_candidates(
            &[
                SourceConfig::default_for(SourceId::Jetformbuilder),
                SourceConfig::default_for(SourceId::Crocoblock),
            ],
            &fetcher,
            fixed_now(),
        )
        .await
        .unwrap();

        assert_eq!(
            pairs(&candidates),
            vec![
                (SourceId::Jetformbuilder, DocType::Tutorial),
                (SourceId::Crocoblock, DocType::Blog),
            ]
        );
    }

    #[tokio::test]
    async fn test_first_source_claims_shared_url() {
        let jet: &[u8] = br#"<urlset>
<url><loc>https://shared.test/docs/page</loc></url>
</urlset>"#;
        let croco: &[u8] = br#"<urlset>
<url><loc>https://shared.test/docs/page/</loc></url>
<url><loc>https://shared.test/kb/other</loc></url>
</urlset>"#;
        let fetcher = stub(HashMap::from([
            ("https://jetformbuilder.com/sitemap_index.xml", jet),
            ("https://crocoblock.com/sitemap_index.xml", croco),
        ]));

        let candidates = discover_candidates(
            &[
                SourceConfig::default_for(SourceId::Jetformbuilder),
                SourceConfig::default_for(SourceId::Crocoblock),
            ],
            &fetcher,
            fixed_now(),
        )
        .await
        .unwrap();

        // Neither host belongs to a known source, so the declared source applies
        assert_eq!(
            pairs(&candidates),
            vec![
                (SourceId::Jetformbuilder, DocType::Docs),
                (SourceId::Crocoblock, DocType::Kb),
            ]
        );
        assert_eq!(candidates[0].url.as_str(), "https://shared.test/docs/page");
    }

    #[tokio::test]
    async fn test_host_overrides_declared_source() {
        let jet: &[u8] = br#"<urlset>
<url><loc>https://crocoblock.com/blog/cross-post</loc></url>
</urlset>"#;
        let fetcher = stub(HashMap::from([(
            "https://jetformbuilder.com/sitemap_index.xml",
            jet,
        )]));

        let candidates = discover_candidates(
            &[SourceConfig::default_for(SourceId::Jetformbuilder)],
            &fetcher,
            fixed_now(),
        )
        .await
        .unwrap();

        assert_eq!(pairs(&candidates), vec![(SourceId::Crocoblock, DocType::Blog)]);
    }

    #[tokio::test]
    async fn test_unknown_source_fails_before_fetching() {
        let calls = Cell::new(0);
        let fetcher = |_url: &str| -> std::result::Result<Vec<u8>, FetchError> {
            calls.set(calls.get() + 1);
            Ok(b"<urlset/>".to_vec())
        };

        let result = discover_candidates(
            &[
                SourceConfig::default_for(SourceId::Jetformbuilder),
                SourceConfig::new("wordpress", "https://wordpress.org/sitemap.xml"),
            ],
            &fetcher,
            fixed_now(),
        )
        .await;

        assert!(matches!(
            result,
            Err(DiscoveryError::Config(ConfigError::UnknownSource(name))) if name == "wordpress"
        ));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_fetch_error_aborts_run() {
        let fetcher = stub(HashMap::new());

        let result = discover_candidates(
            &[SourceConfig::default_for(SourceId::Crocoblock)],
            &fetcher,
            fixed_now(),
        )
        .await;

        assert!(matches!(result, Err(DiscoveryError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_no_configs_no_candidates() {
        let fetcher = stub(HashMap::new());
        let candidates = discover_candidates(&[], &fetcher, fixed_now()).await.unwrap();
        assert!(candidates.is_empty());
    }
}
