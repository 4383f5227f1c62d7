use crate::config::PolicyConfig;
use crate::corpus::{ContentResolver, FetchResult};
use crate::policy::{Rejection, TrapCategory, Verdict};
use crate::url::{
    extract_host, has_denied_extension, has_repeated_segment, is_printable_ascii,
    query_components, strip_path_params, DomainScope,
};
use std::collections::HashMap;
use url::Url;

/// Decides whether a discovered URL is worth following
///
/// The validator owns the per-path query counters used to detect dynamically
/// generated URL spaces. Counters only ever grow: once a host+path has been
/// queried more than `max_query_visits` times, every further query against
/// it is a trap for the rest of the crawl.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    scope: DomainScope,
    max_query_visits: u32,
    max_query_component_length: usize,
    denied_extensions: Vec<String>,
    query_visits: HashMap<String, u32>,
}

impl UrlValidator {
    /// Creates a validator for the given policy
    pub fn new(policy: &PolicyConfig) -> Self {
        Self {
            scope: DomainScope::new(policy.target_domains.iter().cloned()),
            max_query_visits: policy.max_query_visits,
            max_query_component_length: policy.max_query_component_length,
            denied_extensions: policy
                .denied_extensions
                .iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
            query_visits: HashMap::new(),
        }
    }

    /// Resolves a URL and validates it
    ///
    /// Convenience wrapper over [`validate_fetched`](Self::validate_fetched)
    /// for callers that have not resolved the URL yet.
    pub fn validate(&mut self, url: &str, resolver: &dyn ContentResolver) -> Verdict {
        let fetched = resolver.resolve(url);
        self.validate_fetched(&fetched)
    }

    /// Validates a URL whose content has already been resolved
    ///
    /// # Check Order
    ///
    /// The first failing check decides the verdict:
    ///
    /// | # | Check | Verdict on failure |
    /// |---|-------|--------------------|
    /// | 1 | content present, URL printable ASCII | `Trap(FakeUrl)` |
    /// | 2 | parses, scheme is http/https | `Malformed` / `Scheme` |
    /// | 3 | no repeated `/` token | `Trap(RepeatedPathSegment)` |
    /// | 4 | in-domain queries: visit count, component length | `Trap(DynamicPageOverflow)` |
    /// | 5 | has a host in the target domains, path not denylisted | `Malformed` / `OffDomain` / `FileType` |
    ///
    /// Check 4 is the only stateful one, and it only runs for URLs that
    /// survived the cheap structural checks, so malformed or out-of-domain
    /// URLs never touch the counters. Checks 4 and 5 see the path with any
    /// `;params` on its last segment removed.
    pub fn validate_fetched(&mut self, fetched: &FetchResult) -> Verdict {
        let url = fetched.url.as_str();

        if fetched.is_empty() || !is_printable_ascii(url) {
            return TrapCategory::FakeUrl.into();
        }

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return Rejection::Malformed.into(),
        };

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Rejection::Scheme.into();
        }

        if has_repeated_segment(url) {
            return TrapCategory::RepeatedPathSegment.into();
        }

        let path = strip_path_params(parsed.path());
        let host = extract_host(&parsed);
        let in_scope = host.as_deref().is_some_and(|h| self.scope.contains(h));

        if in_scope {
            if let (Some(host), Some(query)) = (&host, parsed.query()) {
                if !query.is_empty() && self.is_query_overflow(host, path, query) {
                    return TrapCategory::DynamicPageOverflow.into();
                }
            }
        }

        if host.is_none() {
            return Rejection::Malformed.into();
        }

        if !in_scope {
            return Rejection::OffDomain.into();
        }

        if has_denied_extension(path, &self.denied_extensions) {
            return Rejection::FileType.into();
        }

        Verdict::Accept
    }

    /// Counts one more query against host+path and checks both overflow rules
    fn is_query_overflow(&mut self, host: &str, path: &str, query: &str) -> bool {
        let visits = self
            .query_visits
            .entry(format!("{}{}", host, path))
            .or_insert(0);
        *visits += 1;

        if *visits > self.max_query_visits {
            return true;
        }

        query_components(query).any(|part| part.chars().count() > self.max_query_component_length)
    }

    /// How many queries have been counted against a host+path so far
    pub fn query_visits(&self, host: &str, path: &str) -> u32 {
        self.query_visits
            .get(&format!("{}{}", host, path))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::StaticCorpus;

    fn validator() -> UrlValidator {
        UrlValidator::new(&PolicyConfig::for_domains(["*.ics.uci.edu"]))
    }

    fn page(url: &str) -> FetchResult {
        FetchResult::found(url, b"<html></html>".to_vec())
    }

    #[test]
    fn test_accepts_plain_in_domain_page() {
        let mut v = validator();
        assert_eq!(
            v.validate_fetched(&page("http://www.ics.uci.edu/about")),
            Verdict::Accept
        );
        assert_eq!(
            v.validate_fetched(&page("https://ics.uci.edu/")),
            Verdict::Accept
        );
    }

    #[test]
    fn test_absent_content_is_fake() {
        let mut v = validator();
        let verdict = v.validate_fetched(&FetchResult::absent("http://www.ics.uci.edu/gone"));
        assert_eq!(verdict.trap(), Some(TrapCategory::FakeUrl));
    }

    #[test]
    fn test_zero_size_content_is_fake() {
        let mut v = validator();
        let verdict = v.validate_fetched(&FetchResult::found("http://www.ics.uci.edu/e", vec![]));
        assert_eq!(verdict.trap(), Some(TrapCategory::FakeUrl));
    }

    #[test]
    fn test_non_ascii_and_control_chars_are_fake() {
        let mut v = validator();
        for url in [
            "http://www.ics.uci.edu/caf\u{e9}",
            "http://www.ics.uci.edu/\u{0}",
            "http://www.ics.uci.edu/a\r\nb",
            "http://www.ics.uci.edu/\u{200b}",
            "http://\u{4f8b}.ics.uci.edu/",
        ] {
            assert_eq!(
                v.validate_fetched(&page(url)).trap(),
                Some(TrapCategory::FakeUrl),
                "{:?} should be fake",
                url
            );
        }
    }

    #[test]
    fn test_fake_check_runs_before_scheme_check() {
        let mut v = validator();
        let verdict = v.validate_fetched(&FetchResult::absent("mailto:someone@ics.uci.edu"));
        assert_eq!(verdict.trap(), Some(TrapCategory::FakeUrl));
    }

    #[test]
    fn test_non_http_scheme_rejected_silently() {
        let mut v = validator();
        for url in [
            "ftp://ftp.ics.uci.edu/pub",
            "mailto:someone@ics.uci.edu",
            "javascript:void(0)",
        ] {
            assert_eq!(
                v.validate_fetched(&page(url)),
                Verdict::Reject(Rejection::Scheme),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_unparseable_rejected_silently() {
        let mut v = validator();
        assert_eq!(
            v.validate_fetched(&page("not a url")),
            Verdict::Reject(Rejection::Malformed)
        );
    }

    #[test]
    fn test_repeated_segment_is_trap() {
        let mut v = validator();
        for url in [
            "http://www.ics.uci.edu/x/y/x/",
            "https://www.ics.uci.edu/a/b/a/b",
            "http://www.example.com/loop/loop",
        ] {
            assert_eq!(
                v.validate_fetched(&page(url)).trap(),
                Some(TrapCategory::RepeatedPathSegment),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_trailing_slash_is_not_a_repeat() {
        let mut v = validator();
        assert!(v
            .validate_fetched(&page("http://www.ics.uci.edu/faculty/"))
            .is_accept());
    }

    #[test]
    fn test_query_threshold_trips_on_151st() {
        let mut v = validator();
        for i in 0..150 {
            let url = format!("http://www.ics.uci.edu/search?q={}", i);
            assert_eq!(v.validate_fetched(&page(&url)), Verdict::Accept, "query {}", i);
        }
        assert_eq!(v.query_visits("www.ics.uci.edu", "/search"), 150);

        let verdict = v.validate_fetched(&page("http://www.ics.uci.edu/search?q=150"));
        assert_eq!(verdict.trap(), Some(TrapCategory::DynamicPageOverflow));

        // one-way trip
        let verdict = v.validate_fetched(&page("http://www.ics.uci.edu/search?q=0"));
        assert_eq!(verdict.trap(), Some(TrapCategory::DynamicPageOverflow));
    }

    #[test]
    fn test_query_counter_is_per_path() {
        let mut v = validator();
        for i in 0..151 {
            let url = format!("http://www.ics.uci.edu/search?q={}", i);
            v.validate_fetched(&page(&url));
        }

        assert!(v
            .validate_fetched(&page("http://www.ics.uci.edu/browse?q=1"))
            .is_accept());
        assert!(v
            .validate_fetched(&page("http://vision.ics.uci.edu/search?q=1"))
            .is_accept());
    }

    #[test]
    fn test_custom_query_threshold() {
        let mut policy = PolicyConfig::for_domains(["*.ics.uci.edu"]);
        policy.max_query_visits = 2;
        let mut v = UrlValidator::new(&policy);

        assert!(v.validate_fetched(&page("http://ics.uci.edu/s?a=1")).is_accept());
        assert!(v.validate_fetched(&page("http://ics.uci.edu/s?a=2")).is_accept());
        assert_eq!(
            v.validate_fetched(&page("http://ics.uci.edu/s?a=3")).trap(),
            Some(TrapCategory::DynamicPageOverflow)
        );
    }

    #[test]
    fn test_long_query_component_is_trap() {
        let mut v = validator();
        let long = "a".repeat(31);
        let url = format!("http://www.ics.uci.edu/login?session={}", long);

        assert_eq!(
            v.validate_fetched(&page(&url)).trap(),
            Some(TrapCategory::DynamicPageOverflow)
        );
        // counted even though it was rejected
        assert_eq!(v.query_visits("www.ics.uci.edu", "/login"), 1);
    }

    #[test]
    fn test_query_component_at_limit_is_fine() {
        let mut v = validator();
        let url = format!("http://www.ics.uci.edu/login?session={}", "a".repeat(30));
        assert!(v.validate_fetched(&page(&url)).is_accept());
    }

    #[test]
    fn test_query_rules_skip_out_of_domain() {
        let mut v = validator();
        let url = format!("http://www.example.com/login?session={}", "a".repeat(64));

        assert_eq!(
            v.validate_fetched(&page(&url)),
            Verdict::Reject(Rejection::OffDomain)
        );
        assert_eq!(v.query_visits("www.example.com", "/login"), 0);
    }

    #[test]
    fn test_empty_query_not_counted() {
        let mut v = validator();
        assert!(v
            .validate_fetched(&page("http://www.ics.uci.edu/page?"))
            .is_accept());
        assert_eq!(v.query_visits("www.ics.uci.edu", "/page"), 0);
    }

    #[test]
    fn test_rejected_structural_checks_leave_counters_alone() {
        let mut v = validator();
        v.validate_fetched(&FetchResult::absent("http://www.ics.uci.edu/s?q=1"));
        v.validate_fetched(&page("http://www.ics.uci.edu/s/s/x?q=1"));
        v.validate_fetched(&page("ftp://www.ics.uci.edu/s?q=1"));

        assert_eq!(v.query_visits("www.ics.uci.edu", "/s"), 0);
        assert_eq!(v.query_visits("www.ics.uci.edu", "/s/s/x"), 0);
    }

    #[test]
    fn test_off_domain_rejected_silently() {
        let mut v = validator();
        for url in [
            "http://www.uci.edu/",
            "http://physics.uci.edu/",
            "http://ics.uci.edu.example.com/",
        ] {
            assert_eq!(
                v.validate_fetched(&page(url)),
                Verdict::Reject(Rejection::OffDomain),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_denied_extensions_rejected_silently() {
        let mut v = validator();
        for url in [
            "http://www.ics.uci.edu/papers/paper.pdf",
            "http://www.ics.uci.edu/img/Logo.JPG",
            "http://www.ics.uci.edu/dist/code.zip",
            "http://www.ics.uci.edu/data/set.csv",
            "http://www.ics.uci.edu/slides/talk.pptx",
        ] {
            assert_eq!(
                v.validate_fetched(&page(url)),
                Verdict::Reject(Rejection::FileType),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_denied_extension_checked_on_path_only() {
        let mut v = validator();
        assert!(v
            .validate_fetched(&page("http://www.ics.uci.edu/view?file=a.pdf"))
            .is_accept());
    }

    #[test]
    fn test_denied_extension_ignores_path_params() {
        let mut v = validator();
        assert_eq!(
            v.validate_fetched(&page(
                "http://www.ics.uci.edu/pubs/paper.pdf;jsessionid=ABC123"
            )),
            Verdict::Reject(Rejection::FileType)
        );
        assert!(v
            .validate_fetched(&page("http://www.ics.uci.edu/pubs;v=2/index.html"))
            .is_accept());
    }

    #[test]
    fn test_query_counter_ignores_path_params() {
        let mut policy = PolicyConfig::for_domains(["*.ics.uci.edu"]);
        policy.max_query_visits = 2;
        let mut v = UrlValidator::new(&policy);

        assert!(v
            .validate_fetched(&page("http://www.ics.uci.edu/s;jsessionid=A?q=1"))
            .is_accept());
        assert!(v
            .validate_fetched(&page("http://www.ics.uci.edu/s;jsessionid=B?q=2"))
            .is_accept());
        assert_eq!(v.query_visits("www.ics.uci.edu", "/s"), 2);
        assert_eq!(
            v.validate_fetched(&page("http://www.ics.uci.edu/s?q=3")).trap(),
            Some(TrapCategory::DynamicPageOverflow)
        );
    }

    #[test]
    fn test_single_quote_is_fake() {
        let mut v = validator();
        assert_eq!(
            v.validate_fetched(&page("http://www.ics.uci.edu/~o'brien/")).trap(),
            Some(TrapCategory::FakeUrl)
        );
        assert!(v
            .validate_fetched(&page("http://www.ics.uci.edu/~o%27brien/"))
            .is_accept());
    }

    #[test]
    fn test_validate_resolves_through_corpus() {
        let corpus = StaticCorpus::new().with_page("http://www.ics.uci.edu/a", "<html></html>");
        let mut v = validator();

        assert!(v.validate("http://www.ics.uci.edu/a", &corpus).is_accept());
        assert_eq!(
            v.validate("http://www.ics.uci.edu/b", &corpus).trap(),
            Some(TrapCategory::FakeUrl)
        );
    }

    #[test]
    fn test_validate_is_idempotent_below_threshold() {
        let mut v = validator();
        for url in [
            "http://www.ics.uci.edu/a",
            "http://www.ics.uci.edu/a/a",
            "http://www.ics.uci.edu/a.pdf",
            "http://www.ics.uci.edu/a?x=1",
            "http://www.example.com/",
        ] {
            let first = v.validate_fetched(&page(url));
            let second = v.validate_fetched(&page(url));
            assert_eq!(first, second, "{}", url);
        }
    }
}
