use crate::url::{matches_domain, CanonicalUrl};
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A documentation source the discovery run knows how to claim pages for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Jetformbuilder,
    Crocoblock,
}

impl SourceId {
    /// Every known source, in default configuration order
    pub const ALL: [SourceId; 2] = [SourceId::Jetformbuilder, SourceId::Crocoblock];

    /// Host pattern claimed by the source (root domain and all subdomains)
    pub fn domain_pattern(&self) -> &'static str {
        match self {
            Self::Jetformbuilder => "*.jetformbuilder.com",
            Self::Crocoblock => "*.crocoblock.com",
        }
    }

    /// Public sitemap index used when no override is configured
    pub fn default_sitemap_url(&self) -> &'static str {
        match self {
            Self::Jetformbuilder => "https://jetformbuilder.com/sitemap_index.xml",
            Self::Crocoblock => "https://crocoblock.com/sitemap_index.xml",
        }
    }

    /// Environment variable overriding the sitemap URL of this source
    pub fn sitemap_env_var(&self) -> &'static str {
        match self {
            Self::Jetformbuilder => "JETFORMBUILDER_SITEMAP_URL",
            Self::Crocoblock => "CROCOBLOCK_SITEMAP_URL",
        }
    }

    /// Converts the source to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Jetformbuilder => "jetformbuilder",
            Self::Crocoblock => "crocoblock",
        }
    }

    /// Parses a source from its database string representation
    ///
    /// Returns None if the string doesn't match any known source.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "jetformbuilder" => Some(Self::Jetformbuilder),
            "crocoblock" => Some(Self::Crocoblock),
            _ => None,
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

impl FromStr for SourceId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_string(s).ok_or_else(|| ConfigError::UnknownSource(s.to_string()))
    }
}

/// Infers which source owns a URL from its host
///
/// A source claims its root domain and any subdomain of it. The suffix must
/// start on a label boundary, so `notcrocoblock.com` is not claimed.
/// Returns `None` if no registered source claims the host.
///
/// # Examples
///
/// ```
/// use docs_discovery::classify::{infer_source, SourceId};
/// use docs_discovery::url::normalize_url;
///
/// let url = normalize_url("https://crocoblock.com/blog/example").unwrap();
/// assert_eq!(infer_source(&url), Some(SourceId::Crocoblock));
///
/// let url = normalize_url("https://example.com/article").unwrap();
/// assert_eq!(infer_source(&url), None);
/// ```
pub fn infer_source(url: &CanonicalUrl) -> Option<SourceId> {
    SourceId::ALL
        .into_iter()
        .find(|source| matches_domain(source.domain_pattern(), url.host()))
}
