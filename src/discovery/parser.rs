//! Sitemap XML parser
//!
//! Recognises the two sitemap document shapes:
//!
//! - **Sitemap index**: `<sitemapindex>` root with `<sitemap><loc>` children
//!   pointing at further sitemaps
//! - **Urlset**: `<urlset>` root with `<url><loc>` children pointing at pages
//!
//! Element names are compared on their local part, so namespace prefixes are
//! ignored. Any other root element is reported as [`SitemapKind::Other`] with
//! no locations. Only `<loc>` elements directly inside `<url>` or `<sitemap>`
//! are collected; extension elements such as `<image:loc>` are skipped.

use quick_xml::events::Event;
use quick_xml::Reader;

/// The kind of sitemap document, decided by its root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapKind {
    /// `<sitemapindex>`: locations are further sitemaps
    Index,
    /// `<urlset>`: locations are content pages
    UrlSet,
    /// Any other root element (local name kept for logging)
    Other(String),
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapDocument {
    pub kind: SitemapKind,
    /// Raw `<loc>` values in document order, trimmed
    pub locations: Vec<String>,
}

/// Parses a sitemap document
///
/// # Returns
///
/// * `Ok(SitemapDocument)` - The document kind and its locations
/// * `Err(String)` - The bytes are not well-formed XML or contain no root element
///
/// # Example
///
/// ```
/// use docs_discovery::discovery::{parse_sitemap, SitemapKind};
///
/// let xml = br#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://crocoblock.com/blog/one/</loc></url>
/// </urlset>"#;
/// let doc = parse_sitemap(xml).unwrap();
/// assert_eq!(doc.kind, SitemapKind::UrlSet);
/// assert_eq!(doc.locations, vec!["https://crocoblock.com/blog/one/"]);
/// ```
pub fn parse_sitemap(xml: &[u8]) -> Result<SitemapDocument, String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut root: Option<String> = None;
    let mut stack: Vec<String> = Vec::new();
    let mut current_loc: Option<String> = None;
    let mut locations = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                open_element(&mut root, &stack, &name)?;

                if name == "loc" && is_entry(stack.last()) {
                    current_loc = Some(String::new());
                }
                stack.push(name);
            }
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                open_element(&mut root, &stack, &name)?;
            }
            Ok(Event::End(_)) => {
                let name = stack.pop().unwrap_or_default();
                if name == "loc" {
                    if let Some(loc) = current_loc.take() {
                        let loc = loc.trim();
                        if !loc.is_empty() {
                            locations.push(loc.to_string());
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(loc) = current_loc.as_mut() {
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    loc.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(format!("unexpected end of document inside <{}>", stack.join("><")));
    }

    let kind = match root.as_deref() {
        Some("sitemapindex") => SitemapKind::Index,
        Some("urlset") => SitemapKind::UrlSet,
        Some(other) => {
            return Ok(SitemapDocument {
                kind: SitemapKind::Other(other.to_string()),
                locations: Vec::new(),
            })
        }
        None => return Err("document has no root element".to_string()),
    };

    Ok(SitemapDocument { kind, locations })
}

/// Records the root element, rejecting a second top-level element
fn open_element(root: &mut Option<String>, stack: &[String], name: &str) -> Result<(), String> {
    if stack.is_empty() {
        if let Some(existing) = root {
            return Err(format!(
                "unexpected element <{}> after root element <{}>",
                name, existing
            ));
        }
        *root = Some(name.to_string());
    }
    Ok(())
}

fn is_entry(parent: Option<&String>) -> bool {
    matches!(parent.map(String::as_str), Some("url") | Some("sitemap"))
}
