use crate::frontier::{Frontier, FrontierResult};
use std::collections::{HashSet, VecDeque};

/// In-memory FIFO frontier
#[derive(Debug, Default)]
pub struct MemoryFrontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
    fetched: u64,
}

impl MemoryFrontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding the given seeds, duplicates dropped
    pub fn with_seeds<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frontier = Self::new();
        for seed in seeds {
            frontier.push(seed.as_ref());
        }
        frontier
    }

    fn push(&mut self, url: &str) -> bool {
        if !self.seen.insert(url.to_string()) {
            return false;
        }
        self.queue.push_back(url.to_string());
        true
    }
}

impl Frontier for MemoryFrontier {
    fn has_next(&self) -> FrontierResult<bool> {
        Ok(!self.queue.is_empty())
    }

    fn next_url(&mut self) -> FrontierResult<Option<String>> {
        let next = self.queue.pop_front();
        if next.is_some() {
            self.fetched += 1;
        }
        Ok(next)
    }

    fn add_url(&mut self, url: &str) -> FrontierResult<bool> {
        Ok(self.push(url))
    }

    fn has_seen(&self, url: &str) -> FrontierResult<bool> {
        Ok(self.seen.contains(url))
    }

    fn fetched_count(&self) -> FrontierResult<u64> {
        Ok(self.fetched)
    }

    fn len(&self) -> FrontierResult<u64> {
        Ok(self.queue.len() as u64)
    }
}
