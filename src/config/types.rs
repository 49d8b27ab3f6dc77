use crate::classify::SourceId;
use serde::Deserialize;

/// Main configuration structure for a discovery run
///
/// Every section is optional in the TOML file; missing sections fall back to
/// [`Config::default`], which targets both known sources at their public
/// sitemap indexes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
    #[serde(rename = "source")]
    pub sources: Vec<SourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            output: OutputConfig::default(),
            sources: SourceId::ALL
                .into_iter()
                .map(SourceConfig::default_for)
                .collect(),
        }
    }
}

/// Sitemap fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Client identifier sent with every sitemap request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "JFBDocsBot/0.1 (+sitemap-discovery)".to_string(),
            timeout_secs: 20,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database holding the crawl queue
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "./discovery.db".to_string(),
        }
    }
}

/// One configured content source and the root of its sitemap tree
///
/// `source` is kept as the configured text; it is checked against
/// [`SourceId`] before discovery starts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    pub source: String,

    #[serde(rename = "sitemap-url")]
    pub sitemap_url: String,
}

impl SourceConfig {
    pub fn new(source: impl Into<String>, sitemap_url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            sitemap_url: sitemap_url.into(),
        }
    }

    /// The source at its default public sitemap URL
    pub fn default_for(source: SourceId) -> Self {
        Self::new(source.to_db_string(), source.default_sitemap_url())
    }
}
