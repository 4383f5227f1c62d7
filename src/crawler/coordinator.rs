//! Crawl engine - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - A pool of workers claiming URLs from the scheduler
//! - Resolving content and extracting links
//! - Offering each link to the frontier through the validation policy
//! - Funneling every analytics update to a single aggregator task
//! - Time limits and cooperative cancellation

use crate::config::{Config, CrawlerConfig};
use crate::corpus::{ContentResolver, DirectoryCorpus, FetchResult};
use crate::crawler::parser::{parse_html, ParseError};
use crate::crawler::scheduler::{Offer, Scheduler, StopHandle};
use crate::frontier::{open_frontier, Frontier};
use crate::policy::UrlValidator;
use crate::state::{CrawlEvent, CrawlState};
use crate::{Result, SnareError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Pages between two progress log lines
const PROGRESS_INTERVAL: u64 = 100;

/// Drives a crawl from a seeded frontier to a final [`CrawlState`]
pub struct CrawlEngine {
    scheduler: Arc<Scheduler>,
    resolver: Arc<dyn ContentResolver>,
    workers: usize,
    time_limit: Option<Duration>,
}

impl CrawlEngine {
    /// Creates an engine over an already seeded frontier
    ///
    /// # Arguments
    ///
    /// * `settings` - Worker count and crawl budgets
    /// * `resolver` - Source of page content
    /// * `frontier` - URLs to crawl; accepted links are pushed back here
    /// * `validator` - Link policy, owned by the engine for the whole crawl
    pub fn new(
        settings: &CrawlerConfig,
        resolver: Arc<dyn ContentResolver>,
        frontier: Box<dyn Frontier>,
        validator: UrlValidator,
    ) -> Self {
        Self {
            scheduler: Arc::new(Scheduler::new(frontier, validator, settings.max_pages)),
            resolver,
            workers: settings.workers.max(1) as usize,
            time_limit: settings.time_limit_secs.map(Duration::from_secs),
        }
    }

    /// Builds an engine from a validated configuration
    ///
    /// Opens the on-disk corpus and the configured frontier. With `fresh`, a
    /// persistent frontier is cleared before seeding.
    pub fn from_config(config: &Config, fresh: bool) -> Result<Self> {
        let corpus = DirectoryCorpus::open(&config.corpus.path, &config.corpus.index_file)?;
        let frontier = open_frontier(&config.frontier, fresh)?;
        let validator = UrlValidator::new(&config.policy);

        Ok(Self::new(&config.crawler, Arc::new(corpus), frontier, validator))
    }

    /// Handle for stopping the crawl from outside, e.g. on Ctrl-C
    pub fn stop_handle(&self) -> StopHandle {
        self.scheduler.stop_handle()
    }

    /// Runs the crawl to completion
    ///
    /// Returns once the frontier is exhausted, the page budget or time limit
    /// is reached, or a stop was requested. URLs already claimed are always
    /// finished first. A frontier failure aborts the crawl.
    pub async fn run(&self) -> Result<CrawlState> {
        tracing::info!("Starting crawl with {} worker(s)", self.workers);
        let start_time = Instant::now();

        let (events, receiver) = mpsc::unbounded_channel();
        let aggregator = tokio::spawn(aggregate(
            receiver,
            Arc::clone(&self.scheduler),
            start_time,
        ));

        let timer = self.time_limit.map(|limit| {
            let stop = self.stop_handle();
            tokio::spawn(async move {
                tokio::time::sleep(limit).await;
                tracing::info!("Time limit of {:?} reached, stopping", limit);
                stop.stop();
            })
        });

        let mut handles = Vec::with_capacity(self.workers);
        for id in 0..self.workers {
            let worker = Worker {
                id,
                scheduler: Arc::clone(&self.scheduler),
                resolver: Arc::clone(&self.resolver),
                events: events.clone(),
            };
            handles.push(tokio::spawn(worker.run()));
        }
        drop(events);

        let mut failure = None;
        for handle in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(SnareError::Worker(e.to_string())),
            };
            if let Err(e) = outcome {
                tracing::error!("Crawl worker failed: {}", e);
                self.stop_handle().stop();
                failure.get_or_insert(e);
            }
        }

        if let Some(timer) = timer {
            timer.abort();
        }

        let state = aggregator
            .await
            .map_err(|e| SnareError::Worker(e.to_string()))?;

        if let Some(e) = failure {
            return Err(e);
        }

        tracing::info!(
            "Crawl completed: {} pages downloaded, {} traps recorded in {:?}",
            state.pages_downloaded(),
            state.total_traps(),
            start_time.elapsed()
        );

        Ok(state)
    }

    /// Returns true if the frontier has seen `url` during this or an earlier run
    pub async fn has_seen(&self, url: &str) -> Result<bool> {
        self.scheduler.has_seen(url).await
    }

    /// Number of URLs still waiting in the frontier
    pub async fn frontier_size(&self) -> Result<u64> {
        self.scheduler.frontier_size().await
    }

    /// Per-path query counter of the link policy
    pub async fn query_visits(&self, host: &str, path: &str) -> u32 {
        self.scheduler.query_visits(host, path).await
    }
}

/// Sole owner of the crawl state while the crawl runs
async fn aggregate(
    mut receiver: mpsc::UnboundedReceiver<CrawlEvent>,
    scheduler: Arc<Scheduler>,
    start_time: Instant,
) -> CrawlState {
    let mut state = CrawlState::new();
    let mut pages = 0u64;

    while let Some(event) = receiver.recv().await {
        let visited = matches!(event, CrawlEvent::Visited(_));
        state.apply(event);

        if visited {
            pages += 1;
            if pages % PROGRESS_INTERVAL == 0 {
                log_progress(&scheduler, pages, start_time).await;
            }
        }
    }

    state
}

async fn log_progress(scheduler: &Scheduler, pages: u64, start_time: Instant) {
    let rate = pages as f64 / start_time.elapsed().as_secs_f64().max(f64::EPSILON);
    match (scheduler.fetched_count().await, scheduler.frontier_size().await) {
        (Ok(fetched), Ok(queued)) => tracing::info!(
            "Progress: {} pages this run ({} fetched overall), {} in frontier, {:.2} pages/sec",
            pages,
            fetched,
            queued,
            rate
        ),
        _ => tracing::info!("Progress: {} pages, {:.2} pages/sec", pages, rate),
    }
}

struct Worker {
    id: usize,
    scheduler: Arc<Scheduler>,
    resolver: Arc<dyn ContentResolver>,
    events: mpsc::UnboundedSender<CrawlEvent>,
}

impl Worker {
    async fn run(self) -> Result<()> {
        tracing::debug!("Worker {} started", self.id);

        while let Some(claim) = self.scheduler.claim().await? {
            self.process_url(claim.url()).await?;
        }

        tracing::debug!("Worker {} finished", self.id);
        Ok(())
    }

    /// Visits one frontier URL and offers its links back to the frontier
    ///
    /// The visit is recorded before anything else, so pages without content
    /// or with unparseable content still count as downloaded.
    async fn process_url(&self, url: &str) -> Result<()> {
        let fetched = self.scheduler.fetched_count().await?;
        let queued = self.scheduler.frontier_size().await?;
        tracing::debug!("Fetching {} ({} fetched, {} queued)", url, fetched, queued);
        self.emit(CrawlEvent::Visited(url.to_string()))?;

        let page = self.resolve(url).await;
        let links = match parse_html(&page) {
            Ok(links) => links,
            Err(ParseError::NoContent(_)) => {
                tracing::debug!("No content for {}", url);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", url, e);
                return Ok(());
            }
        };

        tracing::debug!("Extracted {} links from {}", links.len(), url);

        // each candidate is resolved at most once per page
        let mut candidates: HashMap<String, FetchResult> = HashMap::new();

        for link in links {
            if self.scheduler.has_seen(&link).await? {
                continue;
            }

            let fetched = match candidates.get(&link) {
                Some(fetched) => fetched.clone(),
                None => {
                    let fetched = self.resolve(&link).await;
                    candidates.insert(link.clone(), fetched.clone());
                    fetched
                }
            };

            match self.scheduler.offer(&link, &fetched).await? {
                Offer::Seen => {}
                Offer::Queued => {
                    tracing::debug!("Queued {}", link);
                    self.emit(CrawlEvent::OutLink(url.to_string()))?;
                }
                Offer::Rejected(verdict) => {
                    tracing::debug!("Rejected {}: {:?}", link, verdict);
                    if let Some(category) = verdict.trap() {
                        self.emit(CrawlEvent::Trap(category, link))?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Resolves content off the async runtime, since corpora may block on disk
    async fn resolve(&self, url: &str) -> FetchResult {
        let resolver = Arc::clone(&self.resolver);
        let owned = url.to_string();

        match tokio::task::spawn_blocking(move || resolver.resolve(&owned)).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Content resolution for {} failed: {}", url, e);
                FetchResult::absent(url)
            }
        }
    }

    fn emit(&self, event: CrawlEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| SnareError::Worker("analytics aggregator stopped".to_string()))
    }
}

/// Runs a complete crawl from a configuration
///
/// Opens the corpus and frontier, crawls, and returns the final state. The
/// report is not written; see [`crate::output::write_report`].
///
/// # Example
///
/// ```no_run
/// use snare_crawler::config::load_config;
/// use snare_crawler::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let state = run_crawl(&config, false).await?;
/// println!("{} pages downloaded", state.pages_downloaded());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, fresh: bool) -> Result<CrawlState> {
    let engine = CrawlEngine::from_config(config, fresh)?;
    engine.run().await
}
