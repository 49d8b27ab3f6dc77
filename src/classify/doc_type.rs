use crate::url::CanonicalUrl;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-type bucket of a discovered document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Tutorial,
    Blog,
    Kb,
    Docs,
    Unknown,
}

/// Ordered path rules; the first rule with a matching marker wins
const DOC_TYPE_RULES: &[(&[&str], DocType)] = &[
    (&["/tutorials/", "/tutorial/"], DocType::Tutorial),
    (&["/blog/"], DocType::Blog),
    (&["/kb/", "/knowledge-base/"], DocType::Kb),
    (&["/docs/", "/documentation/"], DocType::Docs),
];

impl DocType {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Tutorial => "tutorial",
            Self::Blog => "blog",
            Self::Kb => "kb",
            Self::Docs => "docs",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a doc type from its database string representation
    ///
    /// Returns None if the string doesn't match any known doc type.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "tutorial" => Some(Self::Tutorial),
            "blog" => Some(Self::Blog),
            "kb" => Some(Self::Kb),
            "docs" => Some(Self::Docs),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Like [`DocType::from_db_string`], but coerces anything unrecognised to `Unknown`
    pub fn from_db_string_lossy(s: &str) -> Self {
        Self::from_db_string(s).unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// Infers the doc type bucket from path markers in the URL
///
/// Matching is case-insensitive over the whole URL and the first matching
/// rule wins: tutorial, blog, kb, docs. Anything else is `Unknown`.
pub fn infer_doc_type(url: &CanonicalUrl) -> DocType {
    infer_doc_type_str(url.as_str())
}

/// [`infer_doc_type`] over a raw string, for callers holding non-canonical URLs
pub fn infer_doc_type_str(url: &str) -> DocType {
    let lower = url.to_lowercase();
    DOC_TYPE_RULES
        .iter()
        .find(|(markers, _)| markers.iter().any(|marker| lower.contains(marker)))
        .map(|(_, doc_type)| *doc_type)
        .unwrap_or(DocType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::normalize_url;

    fn doc_type_of(raw: &str) -> DocType {
        infer_doc_type(&normalize_url(raw).unwrap())
    }

    #[test]
    fn test_infer_doc_type_patterns_and_unknown_fallback() {
        assert_eq!(
            doc_type_of("https://jetformbuilder.com/tutorials/form-example"),
            DocType::Tutorial
        );
        assert_eq!(
            doc_type_of("https://crocoblock.com/blog/post-example"),
            DocType::Blog
        );
        assert_eq!(doc_type_of("https://site.test/knowledge-base/item"), DocType::Kb);
        assert_eq!(doc_type_of("https://site.test/kb/item"), DocType::Kb);
        assert_eq!(doc_type_of("https://site.test/docs/setup"), DocType::Docs);
        assert_eq!(
            doc_type_of("https://site.test/documentation/setup"),
            DocType::Docs
        );
        assert_eq!(
            doc_type_of("https://site.test/features/new-item"),
            DocType::Unknown
        );
    }

    #[test]
    fn test_first_rule_wins() {
        assert_eq!(
            doc_type_of("https://site.test/blog/tutorials/item"),
            DocType::Tutorial
        );
        assert_eq!(doc_type_of("https://site.test/docs/blog/item"), DocType::Blog);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(doc_type_of("https://site.test/Tutorial/Intro"), DocType::Tutorial);
    }

    #[test]
    fn test_marker_needs_both_slashes() {
        // A canonical path has no trailing slash, so a bare section root is unknown
        assert_eq!(doc_type_of("https://site.test/blog/"), DocType::Unknown);
        assert_eq!(doc_type_of("https://site.test/blogging/post"), DocType::Unknown);
    }

    #[test]
    fn test_lossy_db_parse() {
        assert_eq!(DocType::from_db_string_lossy("kb"), DocType::Kb);
        assert_eq!(DocType::from_db_string_lossy("whitepaper"), DocType::Unknown);
    }
}
