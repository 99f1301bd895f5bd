//! Per-run crawl state
//!
//! One `CrawlSession` lives for exactly one crawl invocation. It owns the
//! visited set, the candidate table, and the counters; nothing here is shared
//! across runs, so a second crawl always starts clean.

use crate::classify::{Classification, Priority, Reason};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use url::Url;

/// One successfully fetched page
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub url: Url,
    pub depth: u32,
    pub fetched_at: DateTime<Utc>,
}

/// A document-looking URL accumulated across the crawl
///
/// The same URL may be discovered on several pages through different rules;
/// there is exactly one record per normalized URL, carrying the union of
/// everything observed about it.
#[derive(Debug, Clone)]
pub struct CandidateUrl {
    pub url: Url,
    /// Union of every rule that ever matched this URL
    pub reasons: BTreeSet<Reason>,
    /// Pages the URL was discovered on
    pub found_on: BTreeSet<String>,
    /// Highest priority observed across sightings
    pub priority: Priority,
}

impl CandidateUrl {
    pub fn new(url: Url, classification: &Classification, found_on: &str) -> Self {
        Self {
            url,
            reasons: classification.reasons.clone(),
            found_on: BTreeSet::from([found_on.to_string()]),
            priority: classification.priority,
        }
    }

    /// Folds another sighting of the same URL into this record
    pub fn merge(&mut self, classification: &Classification, found_on: &str) {
        self.reasons.extend(classification.reasons.iter().copied());
        self.found_on.insert(found_on.to_string());
        self.priority = self.priority.max(classification.priority);
    }
}

/// Run counters reported at completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlCounters {
    /// Pages actually fetched (skips do not count)
    pub pages_crawled: usize,
    /// Distinct candidate URLs recorded
    pub candidates_seen: usize,
    /// Candidates that passed verification
    pub verified_count: usize,
}

/// Mutable state for one crawl run
pub struct CrawlSession {
    visited: HashSet<String>,
    /// Keyed by normalized URL string; BTreeMap keeps report order stable
    candidates: BTreeMap<String, CandidateUrl>,
    pages: Vec<PageRecord>,
    pub counters: CrawlCounters,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
            candidates: BTreeMap::new(),
            pages: Vec::new(),
            counters: CrawlCounters::default(),
        }
    }

    /// Records a fetched page and bumps the page counter
    pub fn record_page(&mut self, url: &Url, depth: u32) {
        self.pages.push(PageRecord {
            url: url.clone(),
            depth,
            fetched_at: Utc::now(),
        });
        self.counters.pages_crawled += 1;
    }

    /// Marks a URL visited; returns false if it already was
    ///
    /// Check and insert are a single operation so a URL queued twice is
    /// fetched once.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Records a candidate sighting, merging with any existing record
    ///
    /// Returns true on the first sighting of this URL.
    pub fn record_candidate(
        &mut self,
        url: &Url,
        classification: &Classification,
        found_on: &str,
    ) -> bool {
        let key = url.as_str().to_string();
        match self.candidates.get_mut(&key) {
            Some(existing) => {
                existing.merge(classification, found_on);
                false
            }
            None => {
                self.candidates
                    .insert(key, CandidateUrl::new(url.clone(), classification, found_on));
                self.counters.candidates_seen += 1;
                true
            }
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Consumes the session, yielding its page records and candidate table
    pub fn into_parts(self) -> (Vec<PageRecord>, Vec<CandidateUrl>) {
        (self.pages, self.candidates.into_values().collect())
    }
}

impl Default for CrawlSession {
    fn default() -> Self {
        Self::new()
    }
}
