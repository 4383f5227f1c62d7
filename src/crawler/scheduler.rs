//! Scheduler for handing out frontier URLs to crawl workers
//!
//! This module handles:
//! - Serializing every frontier and validator access behind one lock, so a
//!   seen-check, its validation and the enqueue happen as one step
//! - Tracking in-flight URLs, so an empty frontier only ends the crawl once
//!   no worker can still add to it
//! - The page budget and cooperative cancellation

use crate::corpus::FetchResult;
use crate::frontier::Frontier;
use crate::policy::{UrlValidator, Verdict};
use crate::Result;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

/// Shared cancellation flag that also wakes idle workers
#[derive(Debug, Default)]
struct Signal {
    stopped: AtomicBool,
    wake: Notify,
}

/// Requests that a running crawl stop taking new URLs
///
/// URLs already being processed are finished first.
#[derive(Debug, Clone)]
pub struct StopHandle {
    signal: Arc<Signal>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.signal.stopped.store(true, Ordering::SeqCst);
        self.signal.wake.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.signal.stopped.load(Ordering::SeqCst)
    }
}

/// What happened to a candidate link offered to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// Already queued or visited; not validated
    Seen,

    /// Validated and queued
    Queued,

    /// Validated and rejected
    Rejected(Verdict),
}

/// A URL handed out by [`Scheduler::claim`]
///
/// The URL counts as in flight until the claim is dropped, including when
/// the worker holding it unwinds.
pub struct Claim<'a> {
    url: String,
    scheduler: &'a Scheduler,
}

impl Claim<'_> {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.scheduler.release();
    }
}

struct Shared {
    frontier: Box<dyn Frontier>,
    validator: UrlValidator,
    claimed: u64,
}

/// Scheduler owns the frontier and the validator for the duration of a crawl
pub struct Scheduler {
    shared: Mutex<Shared>,
    // only incremented under the `shared` lock
    in_flight: AtomicUsize,
    signal: Arc<Signal>,
    max_pages: Option<u64>,
}

impl Scheduler {
    /// Creates a scheduler over a seeded frontier
    ///
    /// `max_pages` bounds the number of URLs handed out by this scheduler.
    pub fn new(frontier: Box<dyn Frontier>, validator: UrlValidator, max_pages: Option<u64>) -> Self {
        Self {
            shared: Mutex::new(Shared {
                frontier,
                validator,
                claimed: 0,
            }),
            in_flight: AtomicUsize::new(0),
            signal: Arc::new(Signal::default()),
            max_pages,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            signal: Arc::clone(&self.signal),
        }
    }

    /// Waits for the next URL to process
    ///
    /// Returns `None` once the crawl is over: the frontier is empty with
    /// nothing in flight, the page budget is spent, or a stop was requested.
    /// The returned [`Claim`] keeps the URL in flight until it is dropped.
    pub async fn claim(&self) -> Result<Option<Claim<'_>>> {
        loop {
            // Registered before checking, so a wake between the check and
            // the await is not lost.
            let notified = self.signal.wake.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut shared = self.shared.lock().await;

                if self.signal.stopped.load(Ordering::SeqCst) {
                    return Ok(None);
                }

                if let Some(max) = self.max_pages {
                    if shared.claimed >= max {
                        tracing::debug!("Page budget of {} reached", max);
                        return Ok(None);
                    }
                }

                if let Some(url) = shared.frontier.next_url()? {
                    self.in_flight.fetch_add(1, Ordering::SeqCst);
                    shared.claimed += 1;
                    return Ok(Some(Claim {
                        url,
                        scheduler: self,
                    }));
                }

                if self.in_flight.load(Ordering::SeqCst) == 0 {
                    drop(shared);
                    // wake idle workers so they see the same empty frontier
                    self.signal.wake.notify_waiters();
                    return Ok(None);
                }
            }

            notified.await;
        }
    }

    /// Marks a claimed URL as fully processed
    fn release(&self) {
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        self.signal.wake.notify_waiters();
    }

    /// Number of URLs claimed and not yet released
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Returns true if the frontier has already seen `url`
    pub async fn has_seen(&self, url: &str) -> Result<bool> {
        let shared = self.shared.lock().await;
        Ok(shared.frontier.has_seen(url)?)
    }

    /// Validates a candidate link and queues it if accepted
    ///
    /// `fetched` is the candidate's own resolved content. The seen-check is
    /// repeated under the lock because another worker may have queued the
    /// link since the caller last looked.
    pub async fn offer(&self, url: &str, fetched: &FetchResult) -> Result<Offer> {
        let offer = {
            let mut shared = self.shared.lock().await;

            if shared.frontier.has_seen(url)? {
                return Ok(Offer::Seen);
            }

            let verdict = shared.validator.validate_fetched(fetched);
            if !verdict.is_accept() {
                return Ok(Offer::Rejected(verdict));
            }

            if shared.frontier.add_url(url)? {
                Offer::Queued
            } else {
                Offer::Seen
            }
        };

        self.signal.wake.notify_waiters();
        Ok(offer)
    }

    /// Number of URLs waiting in the frontier
    pub async fn frontier_size(&self) -> Result<u64> {
        let shared = self.shared.lock().await;
        Ok(shared.frontier.len()?)
    }

    /// Number of URLs the frontier has handed out, including earlier runs
    pub async fn fetched_count(&self) -> Result<u64> {
        let shared = self.shared.lock().await;
        Ok(shared.frontier.fetched_count()?)
    }

    /// Per-path query counter of the validator
    pub async fn query_visits(&self, host: &str, path: &str) -> u32 {
        self.shared.lock().await.validator.query_visits(host, path)
    }
}
