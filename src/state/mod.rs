//! State module for crawl analytics
//!
//! `CrawlState` holds everything the final report needs: visits per
//! subdomain, accepted out-links per page, the downloaded set and the trap
//! inventory. Workers describe changes as [`CrawlEvent`]s; one owner applies
//! them.

mod crawl_state;

pub use crawl_state::{CrawlEvent, CrawlState};
