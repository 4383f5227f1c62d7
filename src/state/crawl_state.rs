//! Crawl analytics accumulated over one run
//!
//! A single owner mutates this while the crawl runs; it is read once at the
//! end to render the report.

use crate::policy::TrapCategory;
use crate::url::host_of;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A mutation of [`CrawlState`] produced by a crawl worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    /// A URL was taken from the frontier and visited
    Visited(String),

    /// A link extracted from this URL was accepted and queued
    OutLink(String),

    /// A candidate link was rejected as trap evidence
    Trap(TrapCategory, String),
}

/// Per-run analytics
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    subdomain_counts: BTreeMap<String, u64>,
    // first-seen order is kept so best_page ties resolve deterministically
    out_links: Vec<(String, u64)>,
    out_link_index: HashMap<String, usize>,
    downloaded: BTreeSet<String>,
    traps: BTreeMap<TrapCategory, BTreeSet<String>>,
}

impl CrawlState {
    /// Creates an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one worker event
    pub fn apply(&mut self, event: CrawlEvent) {
        match event {
            CrawlEvent::Visited(url) => {
                self.record_visit(&url);
            }
            CrawlEvent::OutLink(from) => self.record_out_link(&from),
            CrawlEvent::Trap(category, url) => {
                self.record_trap(category, &url);
            }
        }
    }

    /// Records a visited URL and bumps its host's counter
    ///
    /// Returns false if the URL had already been recorded, which leaves
    /// the counters untouched. Hostless URLs count under the empty host.
    pub fn record_visit(&mut self, url: &str) -> bool {
        if !self.downloaded.insert(url.to_string()) {
            tracing::warn!("URL visited twice: {}", url);
            return false;
        }
        *self.subdomain_counts.entry(host_of(url)).or_insert(0) += 1;
        true
    }

    /// Counts one accepted out-link for `from`
    pub fn record_out_link(&mut self, from: &str) {
        match self.out_link_index.get(from) {
            Some(&i) => self.out_links[i].1 += 1,
            None => {
                self.out_link_index
                    .insert(from.to_string(), self.out_links.len());
                self.out_links.push((from.to_string(), 1));
            }
        }
    }

    /// Adds `url` to the trap inventory
    ///
    /// Returns false if it was already listed under this category.
    pub fn record_trap(&mut self, category: TrapCategory, url: &str) -> bool {
        self.traps
            .entry(category)
            .or_default()
            .insert(url.to_string())
    }

    /// The URL with the most accepted out-links, ties going to the first recorded
    pub fn best_page(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (url, count) in &self.out_links {
            if best.map_or(true, |(_, top)| *count > top) {
                best = Some((url.as_str(), *count));
            }
        }
        best
    }

    pub fn subdomain_counts(&self) -> &BTreeMap<String, u64> {
        &self.subdomain_counts
    }

    pub fn downloaded(&self) -> &BTreeSet<String> {
        &self.downloaded
    }

    pub fn traps(&self) -> &BTreeMap<TrapCategory, BTreeSet<String>> {
        &self.traps
    }

    /// Accepted out-link count for `url`, zero if none were recorded
    pub fn out_link_count(&self, url: &str) -> u64 {
        self.out_link_index
            .get(url)
            .map(|&i| self.out_links[i].1)
            .unwrap_or(0)
    }

    /// Out-link counts in first-recorded order
    pub fn out_link_counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.out_links.iter().map(|(url, count)| (url.as_str(), *count))
    }

    /// Number of URLs recorded under `category`
    pub fn trap_count(&self, category: TrapCategory) -> usize {
        self.traps.get(&category).map_or(0, |urls| urls.len())
    }

    /// Total number of trap URLs across all categories
    pub fn total_traps(&self) -> usize {
        self.traps.values().map(|urls| urls.len()).sum()
    }

    pub fn pages_downloaded(&self) -> usize {
        self.downloaded.len()
    }
}
