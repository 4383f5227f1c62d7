//! Console statistics for a finished crawl

use crate::policy::TrapCategory;
use crate::state::CrawlState;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Pages taken from the frontier this run
    pub pages_downloaded: u64,

    /// Number of distinct subdomains visited
    pub subdomains: u64,

    /// Accepted out-links across all pages
    pub total_out_links: u64,

    /// Trap URLs per category, in report order
    pub traps: Vec<(TrapCategory, u64)>,

    /// URLs left in the frontier
    pub frontier_remaining: u64,
}

impl CrawlStatistics {
    /// Summarizes a final crawl state
    pub fn from_state(state: &CrawlState, frontier_remaining: u64) -> Self {
        Self {
            pages_downloaded: state.pages_downloaded() as u64,
            subdomains: state.subdomain_counts().len() as u64,
            total_out_links: state.out_link_counts().map(|(_, count)| count).sum(),
            traps: TrapCategory::ALL
                .iter()
                .map(|&category| (category, state.trap_count(category) as u64))
                .collect(),
            frontier_remaining,
        }
    }

    pub fn total_traps(&self) -> u64 {
        self.traps.iter().map(|(_, count)| count).sum()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages downloaded: {}", stats.pages_downloaded);
    println!("  Subdomains visited: {}", stats.subdomains);
    println!("  Accepted out links: {}", stats.total_out_links);
    println!("  Left in frontier: {}", stats.frontier_remaining);
    println!();

    println!("Traps ({}):", stats.total_traps());
    for (category, count) in &stats.traps {
        let percentage = if stats.total_traps() > 0 {
            (*count as f64 / stats.total_traps() as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", category, count, percentage);
    }
}
