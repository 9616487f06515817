//! HTML parser for extracting links
//!
//! Only `<a href>` targets are followed. Markup errors never fail the
//! parse; html5ever recovers and whatever anchors survive are returned.

use crate::url::normalize_parsed;
use scraper::{Html, Selector};
use url::Url;

/// Extracts every followable link from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` resolving against `base_url` to an `http`/`https` URL
///
/// **Exclude:**
/// - Same-page anchors (`#section`)
/// - `javascript:`, `mailto:` and other non-HTTP schemes
/// - hrefs that do not resolve
///
/// Links are normalized but not deduplicated: a page linking twice to the
/// same URL counts twice towards its `links_to`.
///
/// # Example
///
/// ```
/// use objcrawler::crawler::parse_links;
/// use url::Url;
///
/// let html = r##"<a href="/models/chair.zip">Chair</a><a href="#top">Top</a>"##;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = parse_links(html, &base_url);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/models/chair.zip");
/// ```
pub fn parse_links(html: &str, base_url: &Url) -> Vec<Url> {
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(e) => {
            tracing::warn!("Invalid link selector: {:?}", e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute, normalized URL
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    // Skip empty hrefs and same-page anchors
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = match base_url.join(href) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Could not resolve {:?} against {}: {}", href, base_url, e);
            return None;
        }
    };

    // normalize_parsed rejects anything that is not http(s) with a host
    normalize_parsed(absolute).ok()
}
