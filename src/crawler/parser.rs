//! HTML link extraction
//!
//! Turns fetched page content into the absolute URLs of its anchors, in
//! document order. Nothing is filtered or deduplicated here: deciding which
//! links are worth following is the policy's job, and the frontier owns
//! deduplication.

use crate::corpus::FetchResult;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// Reasons a page yields no links
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no content for {0}")]
    NoContent(String),

    #[error("cannot resolve links against {url}: {source}")]
    InvalidBase {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Extracts every `<a href>` of a fetched page as an absolute URL
///
/// Relative and protocol-relative hrefs are resolved against the page URL.
/// Hrefs that cannot be resolved at all are skipped.
///
/// # Example
///
/// ```
/// use snare_crawler::corpus::FetchResult;
/// use snare_crawler::crawler::parse_html;
///
/// let page = FetchResult::found(
///     "http://www.ics.uci.edu/a",
///     br#"<a href="/b">b</a><a href="//www.ics.uci.edu/c">c</a>"#.to_vec(),
/// );
/// let links = parse_html(&page).unwrap();
/// assert_eq!(links, vec!["http://www.ics.uci.edu/b", "http://www.ics.uci.edu/c"]);
/// ```
pub fn parse_html(page: &FetchResult) -> Result<Vec<String>, ParseError> {
    let content = page
        .content
        .as_deref()
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ParseError::NoContent(page.url.clone()))?;

    let base_url = Url::parse(page.url.trim()).map_err(|source| ParseError::InvalidBase {
        url: page.url.clone(),
        source,
    })?;

    let html = String::from_utf8_lossy(content);
    let document = Html::parse_document(&html);

    extract_links(&document, &base_url)
}

fn extract_links(document: &Html, base_url: &Url) -> Result<Vec<String>, ParseError> {
    let selector =
        Selector::parse("a[href]").map_err(|e| ParseError::Selector(format!("{:?}", e)))?;

    let links = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect();

    Ok(links)
}

/// Resolves an href against the page URL
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    match base_url.join(href.trim()) {
        Ok(absolute_url) => Some(absolute_url.to_string()),
        Err(e) => {
            tracing::debug!("Skipping unresolvable href {:?} on {}: {}", href, base_url, e);
            None
        }
    }
}

/// Like [`parse_html`], but degrades to an empty list on failure
pub fn extract_links_simple(page: &FetchResult) -> Vec<String> {
    parse_html(page).unwrap_or_default()
}
