//! Crawler module for the traversal loop
//!
//! This module contains the core crawling logic, including:
//! - HTML parsing and link extraction
//! - Frontier access, page budget and cancellation
//! - Overall crawl coordination across workers

mod coordinator;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, CrawlEngine};
pub use parser::{extract_links_simple, parse_html, ParseError};
pub use scheduler::{Claim, Offer, Scheduler, StopHandle};
