//! Crawl progress events
//!
//! The crawl loop reports progress through an unbounded channel so that
//! consumers (CLI, tests, a future GUI) can observe it without ever blocking
//! the crawl. A sink built with [`EventSink::disabled`] silently drops every
//! event, which is the default for library callers that only want the final
//! report.

use crate::classify::Priority;
use crate::crawler::CrawlCounters;
use crate::verify::VerifyMethod;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Why a queued page was skipped rather than fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Already in the visited set
    AlreadyVisited,
    /// Beyond the configured maximum depth
    DepthExceeded,
    /// Disallowed by robots policy
    RobotsDenied,
    /// Transient fetch failure (timeout, connection error)
    FetchFailed,
}

/// Progress and result events emitted during a crawl run
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    /// A page was fetched and processed
    PageFetched { url: String, depth: u32, status: u16 },
    /// A queued page was skipped
    PageSkipped { url: String, reason: SkipReason },
    /// A URL was classified as a document candidate (first sighting)
    CandidateFound { url: String, priority: Priority },
    /// A candidate passed verification
    CandidateVerified { url: String, method: VerifyMethod },
    /// A candidate was rejected during verification
    CandidateRejected { url: String, reason: String },
    /// The stop signal ended the run early
    Stopped,
    /// The run completed normally
    Completed { counters: CrawlCounters },
}

/// Non-blocking event outlet handed to the crawler
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Option<UnboundedSender<CrawlEvent>>,
}

impl EventSink {
    /// Creates a sink/receiver pair backed by an unbounded channel
    pub fn channel() -> (Self, UnboundedReceiver<CrawlEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// Creates a sink that drops all events
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Emits an event; a closed or absent receiver is ignored
    pub fn emit(&self, event: CrawlEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
