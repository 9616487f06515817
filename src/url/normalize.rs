use crate::UrlError;
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Normalizes a URL before it is fingerprinted and stored in the frontier
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed (the parser lowercases the host,
///    drops default ports and removes `.`/`..` path segments)
/// 2. Reject anything that is not HTTP or HTTPS
/// 3. Reject URLs without a host
/// 4. Remove fragment (everything after #)
/// 5. Remove tracking query parameters
/// 6. Remove empty query string (trailing ?)
///
/// Scheme, `www.` prefixes and trailing slashes are preserved: they change
/// what the server returns and how relative links on the page resolve. The
/// remaining query is kept byte for byte, in its original order and encoding.
///
/// # Examples
///
/// ```
/// use objcrawler::url::normalize_url;
///
/// let url = normalize_url("http://Models.EXAMPLE.com/a/../chair.zip#top").unwrap();
/// assert_eq!(url.as_str(), "http://models.example.com/chair.zip");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already parsed URL (for example one produced by `Url::join`)
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if let Some(query) = url.query() {
        let kept = strip_tracking_params(query);
        url.set_query(if kept.is_empty() { None } else { Some(kept.as_str()) });
    }

    Ok(url)
}

/// Drops tracking parameters from a raw query string, leaving the rest untouched
fn strip_tracking_params(query: &str) -> String {
    query
        .split('&')
        .filter(|param| !param.is_empty())
        .filter(|param| {
            let key = param.split('=').next().unwrap_or_default();
            !is_tracking_param(key)
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_scheme() {
        let result = normalize_url("http://example.com/page").unwrap();
        assert_eq!(result.as_str(), "http://example.com/page");
    }

    #[test]
    fn test_keeps_trailing_slash() {
        let result = normalize_url("https://example.com/models/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/models/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_remove_tracking_params() {
        let result = normalize_url("https://example.com/page?utm_source=twitter").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_query_order_is_kept() {
        let result = normalize_url("https://example.com/page?b=2&fbclid=x&a=1").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page?b=2&a=1");

        let result = normalize_url("http://test.com/dl?b=2&a=1&b=1").unwrap();
        assert_eq!(result.as_str(), "http://test.com/dl?b=2&a=1&b=1");
    }

    #[test]
    fn test_query_is_not_reencoded() {
        for link in [
            "http://test.com/get.php?download",
            "http://test.com/dl?file=/models/chair.zip",
            "http://test.com/?/files/chair.blend",
            "http://test.com/dl?name=chair%20v2.zip",
        ] {
            assert_eq!(normalize_url(link).unwrap().as_str(), link);
        }
    }

    #[test]
    fn test_tracking_params_removed_from_raw_query() {
        let result =
            normalize_url("http://test.com/dl?file=/models/chair.zip&utm_source=x&download").unwrap();
        assert_eq!(result.as_str(), "http://test.com/dl?file=/models/chair.zip&download");
    }

    #[test]
    fn test_dot_segments_and_host_case() {
        let result = normalize_url("https://EXAMPLE.COM/a/../b/./Chair.blend").unwrap();
        assert_eq!(result.as_str(), "https://example.com/b/Chair.blend");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("http://test.com").unwrap();
        assert_eq!(result.as_str(), "http://test.com/");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/model.zip");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        assert!(matches!(
            normalize_url("not a url").unwrap_err(),
            UrlError::Parse(_)
        ));
    }

    #[test]
    fn test_normalize_parsed_rejects_mailto() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert!(normalize_parsed(url).is_err());
    }
}
