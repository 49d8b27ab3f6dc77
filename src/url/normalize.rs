use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// A URL in canonical identity form
///
/// Two raw URLs that differ only cosmetically (scheme/host case, trailing
/// slash, query string, fragment) collapse to the same `CanonicalUrl`. The
/// canonical form is the key of the crawl queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Returns the canonical URL as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the lowercase host of the URL
    pub fn host(&self) -> &str {
        // Canonical URLs always carry a host
        self.0.host_str().unwrap_or_default()
    }

    /// Returns the path component (always starts with `/`)
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Consumes the canonical URL and returns its string form
    pub fn into_string(self) -> String {
        self.0.into()
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Normalizes a raw URL into its canonical form, or `None` if it is rejected
///
/// See [`try_normalize_url`] for the rules and for the rejection reason.
///
/// # Examples
///
/// ```
/// use docs_discovery::url::normalize_url;
///
/// let url = normalize_url("https://Example.COM/tutorials/demo/?x=1#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/tutorials/demo");
///
/// assert!(normalize_url("mailto:ops@example.com").is_none());
/// ```
pub fn normalize_url(raw: &str) -> Option<CanonicalUrl> {
    try_normalize_url(raw).ok()
}

/// Normalizes a raw URL according to the discovery canonicalization rules
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace and parse; reject if malformed or relative
/// 2. Reject anything that is not `http` or `https`
/// 3. Reject URLs without an authority (`http:///x`, `http:x`) or host
/// 4. Lowercase the scheme and host; keep an explicit non-default port
/// 5. Drop any `user:password@` credentials
/// 6. Empty path becomes `/`; trailing slashes are stripped except for root
/// 7. Drop the query string and the fragment
pub fn try_normalize_url(raw: &str) -> UrlResult<CanonicalUrl> {
    let raw = raw.trim();
    let mut url = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;

    // The url crate already lowercases the scheme
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    // WHATWG parsing recovers a host from `http:///x` or `http:x`; the raw
    // text must carry a non-empty authority of its own
    if !has_authority(raw) {
        return Err(UrlError::MissingHost);
    }

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => return Err(UrlError::MissingHost),
    };
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Parse(format!("Failed to set host: {}", e)))?;

    url.set_username("")
        .and_then(|()| url.set_password(None))
        .map_err(|()| UrlError::Parse("Failed to strip credentials".to_string()))?;

    let path = normalize_path(url.path());
    url.set_path(&path);

    url.set_query(None);
    url.set_fragment(None);

    Ok(CanonicalUrl(url))
}

/// Returns true if the text after `scheme:` is `//` followed by an authority
fn has_authority(raw: &str) -> bool {
    let Some((_, rest)) = raw.split_once(':') else {
        return false;
    };
    match rest.strip_prefix("//") {
        Some(authority) => !authority.is_empty() && !authority.starts_with(['/', '\\']),
        None => false,
    }
}

/// Strips trailing slashes from a non-root path
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
