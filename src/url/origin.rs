use url::Url;

/// Derives the origin (scheme, host and non-default port) of a URL
///
/// robots.txt rules apply per origin, so this is the key the robots cache
/// uses. URLs with opaque origins (`data:`, `mailto:`...) have none.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use objcrawler::url::origin_of;
///
/// let url = Url::parse("http://www.test.com/index.html").unwrap();
/// assert_eq!(origin_of(&url), Some("http://www.test.com".to_string()));
/// ```
pub fn origin_of(url: &Url) -> Option<String> {
    let origin = url.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}
