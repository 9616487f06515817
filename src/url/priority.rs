use url::Url;

/// Suffix of the archives the extraction pool knows how to open
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Suffix of native Blender model files
pub const MODEL_SUFFIX: &str = ".blend";

/// Priority tier for URLs that look like archives or model files
pub const URGENT_PRIORITY: i64 = 1;

/// Priority tier for everything else
pub const DEFAULT_PRIORITY: i64 = 2;

/// Returns true if `name` ends with the archive suffix (case-sensitive)
pub fn has_archive_suffix(name: &str) -> bool {
    name.ends_with(ARCHIVE_SUFFIX)
}

/// Returns true if `name` ends with the model file suffix (case-sensitive)
pub fn has_model_suffix(name: &str) -> bool {
    name.ends_with(MODEL_SUFFIX)
}

/// Assigns a crawl priority to a URL; lower values are crawled sooner
///
/// Only the path is inspected, so `?download=1` style queries do not hide
/// an archive.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use objcrawler::url::priority_for;
///
/// let archive = Url::parse("http://example.com/chair.zip").unwrap();
/// let page = Url::parse("http://example.com/chairs.html").unwrap();
/// assert!(priority_for(&archive) < priority_for(&page));
/// ```
pub fn priority_for(url: &Url) -> i64 {
    let path = url.path();
    if has_archive_suffix(path) || has_model_suffix(path) {
        URGENT_PRIORITY
    } else {
        DEFAULT_PRIORITY
    }
}
