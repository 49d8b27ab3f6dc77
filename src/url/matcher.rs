/// Checks if a host matches a registered domain pattern
///
/// Two pattern shapes are supported:
/// 1. Exact: `"crocoblock.com"` matches only `"crocoblock.com"`
/// 2. Wildcard: `"*.crocoblock.com"` matches the bare domain and any
///    subdomain at any depth (`"docs.crocoblock.com"`,
///    `"a.b.crocoblock.com"`), but never a different registrable domain
///    that merely shares the suffix (`"notcrocoblock.com"`)
///
/// Matching is case-insensitive on the host.
///
/// # Examples
///
/// ```
/// use docs_discovery::url::matches_domain;
///
/// assert!(matches_domain("*.crocoblock.com", "crocoblock.com"));
/// assert!(matches_domain("*.crocoblock.com", "Docs.Crocoblock.com"));
/// assert!(!matches_domain("*.crocoblock.com", "notcrocoblock.com"));
/// assert!(!matches_domain("crocoblock.com", "docs.crocoblock.com"));
/// ```
pub fn matches_domain(pattern: &str, host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    match pattern.strip_prefix("*.") {
        Some(base) => {
            host == base
                || host
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => host == pattern,
    }
}
