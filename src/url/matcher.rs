/// Checks if a host falls under a domain pattern
///
/// Two kinds of pattern are understood:
/// 1. Exact: "ics.uci.edu" matches only "ics.uci.edu"
/// 2. Suffix: "*.ics.uci.edu" matches "ics.uci.edu" itself and every
///    subdomain beneath it ("www.ics.uci.edu", "a.b.ics.uci.edu")
///
/// Hosts are compared ASCII case-insensitively. A suffix only matches on a
/// label boundary, so "*.uci.edu" does not match "notuci.edu".
///
/// # Examples
///
/// ```
/// use snare_crawler::url::matches_wildcard;
///
/// assert!(matches_wildcard("*.ics.uci.edu", "vision.ics.uci.edu"));
/// assert!(matches_wildcard("*.ics.uci.edu", "ics.uci.edu"));
/// assert!(!matches_wildcard("*.ics.uci.edu", "cs.uci.edu"));
/// assert!(!matches_wildcard("ics.uci.edu", "www.ics.uci.edu"));
/// ```
pub fn matches_wildcard(pattern: &str, host: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            if host.eq_ignore_ascii_case(base) {
                return true;
            }
            // host must be "<labels>.<base>"
            let (host, base) = (host.as_bytes(), base.as_bytes());
            host.len() > base.len() + 1
                && host[host.len() - base.len() - 1] == b'.'
                && host[host.len() - base.len()..].eq_ignore_ascii_case(base)
        }
        None => host.eq_ignore_ascii_case(pattern),
    }
}

/// The set of domains a crawl is confined to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    patterns: Vec<String>,
}

impl DomainScope {
    /// Builds a scope from domain patterns such as "*.ics.uci.edu"
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the host matches any pattern in the scope
    pub fn contains(&self, host: &str) -> bool {
        !host.is_empty()
            && self
                .patterns
                .iter()
                .any(|pattern| matches_wildcard(pattern, host))
    }

    /// The configured patterns, in configuration order
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
