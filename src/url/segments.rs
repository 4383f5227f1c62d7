use std::collections::HashSet;

/// Returns true if every character of the URL survives a printable-ASCII
/// escaping round trip unchanged
///
/// Anything outside `0x20..=0x7E` would be escaped, and so would a
/// backslash or a single quote. URLs that fail this are decoys or were mangled on the way in.
/// Legitimate international URLs that were never percent-encoded fail it as
/// well; the check trades that recall for cheap detection of garbage.
///
/// ```
/// use snare_crawler::url::is_printable_ascii;
///
/// assert!(is_printable_ascii("http://www.ics.uci.edu/~eppstein/"));
/// assert!(!is_printable_ascii("http://www.ics.uci.edu/caf\u{e9}"));
/// assert!(!is_printable_ascii("http://www.ics.uci.edu/a\nb"));
/// assert!(!is_printable_ascii("http://www.ics.uci.edu/~o'brien/"));
/// ```
pub fn is_printable_ascii(url: &str) -> bool {
    url.chars()
        .all(|c| (' '..='~').contains(&c) && c != '\\' && c != '\'')
}

/// Returns true if some `/`-separated token of the URL appears twice
///
/// The whole string is tokenised, host included, so
/// `http://a.com/x/y/x` and `http://a.com/a.com` both repeat. Empty tokens
/// (the `//` after the scheme, doubled or trailing slashes) are ignored.
///
/// ```
/// use snare_crawler::url::has_repeated_segment;
///
/// assert!(has_repeated_segment("http://ics.uci.edu/a/b/a/b"));
/// assert!(!has_repeated_segment("http://ics.uci.edu/a/b/"));
/// ```
pub fn has_repeated_segment(url: &str) -> bool {
    let tokens: Vec<&str> = url.split('/').filter(|t| !t.is_empty()).collect();
    let distinct: HashSet<&str> = tokens.iter().copied().collect();
    distinct.len() < tokens.len()
}

/// Returns the pieces of a query string when split on `=`
///
/// `a=1&b=2` yields `["a", "1&b", "2"]`; the split deliberately does not
/// separate pairs, so a long run of `&`-joined short values still adds up.
pub fn query_components(query: &str) -> impl Iterator<Item = &str> {
    query.split('=')
}

/// Cuts `;params` off the last path segment
///
/// Only the final segment carries parameters, so `/a;x/b.pdf;y` becomes
/// `/a;x/b.pdf`.
///
/// ```
/// use snare_crawler::url::strip_path_params;
///
/// assert_eq!(strip_path_params("/pubs/paper.pdf;jsessionid=ABC"), "/pubs/paper.pdf");
/// assert_eq!(strip_path_params("/a;x/b"), "/a;x/b");
/// ```
pub fn strip_path_params(path: &str) -> &str {
    let start = path.rfind('/').map_or(0, |i| i + 1);
    match path[start..].find(';') {
        Some(i) => &path[..start + i],
        None => path,
    }
}

/// Returns true if the path ends in `.<ext>` for one of the given extensions
///
/// Comparison is ASCII case-insensitive; `extensions` must already be lowercase.
pub fn has_denied_extension<S: AsRef<str>>(path: &str, extensions: &[S]) -> bool {
    let path = path.to_ascii_lowercase();
    match path.rsplit_once('.') {
        Some((_, ext)) => extensions.iter().any(|denied| denied.as_ref() == ext),
        None => false,
    }
}
