use url::Url;

/// Extracts the lowercase host from a URL
///
/// Returns `None` for URLs without a host (`mailto:`, `data:` and friends).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use snare_crawler::url::extract_host;
///
/// let url = Url::parse("http://Vision.ICS.uci.edu/papers").unwrap();
/// assert_eq!(extract_host(&url), Some("vision.ics.uci.edu".to_string()));
///
/// let url = Url::parse("mailto:someone@ics.uci.edu").unwrap();
/// assert_eq!(extract_host(&url), None);
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Host of a raw URL string, or an empty string when it has none
///
/// Used for per-subdomain bookkeeping, where an unparseable URL still has to
/// be counted somewhere.
pub fn host_of(url_str: &str) -> String {
    Url::parse(url_str)
        .ok()
        .and_then(|url| extract_host(&url))
        .unwrap_or_default()
}

/// Strips a leading `scheme://` from a URL string
///
/// ```
/// use snare_crawler::url::strip_scheme;
///
/// assert_eq!(strip_scheme("http://www.ics.uci.edu/a"), "www.ics.uci.edu/a");
/// assert_eq!(strip_scheme("www.ics.uci.edu/a"), "www.ics.uci.edu/a");
/// ```
pub fn strip_scheme(url_str: &str) -> &str {
    match url_str.split_once("://") {
        Some((scheme, rest))
            if !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) =>
        {
            rest
        }
        _ => url_str,
    }
}
