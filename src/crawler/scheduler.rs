//! Breadth-first crawl loop
//!
//! Single polite worker: a FIFO queue of `(url, depth)` pairs seeded at depth
//! zero, with per-host delay between requests. Classification happens inline
//! as links are extracted; verification runs as a second phase once the queue
//! drains, so the crawl itself never downloads candidate bodies. The stop
//! flag is polled at the top of every iteration and between verifications,
//! which makes cancellation latency one request at worst.

use crate::classify::{Classifier, ExtractedLink, HeuristicClassifier, LinkOrigin, Reason};
use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::parser::extract_links;
use crate::crawler::session::{CandidateUrl, CrawlCounters, CrawlSession, PageRecord};
use crate::events::{CrawlEvent, EventSink, SkipReason};
use crate::robots::RobotsCache;
use crate::url::{ensure_scheme, normalize, same_site};
use crate::verify::{VerifiedDocument, Verifier};
use crate::ConfigError;
use reqwest::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Everything a crawl run produced
#[derive(Debug)]
pub struct CrawlReport {
    /// Every page fetched, in crawl order
    pub pages: Vec<PageRecord>,
    /// Every distinct candidate, verified or not
    pub candidates: Vec<CandidateUrl>,
    /// Candidates that passed verification
    pub verified: Vec<VerifiedDocument>,
    pub counters: CrawlCounters,
    /// True when the stop signal ended the run early
    pub stopped: bool,
}

/// The crawl engine: owns the HTTP client, classifier, verifier, and robots
/// checker for repeated runs
pub struct Crawler {
    config: Config,
    client: Client,
    classifier: Box<dyn Classifier>,
    verifier: Verifier,
    robots: RobotsCache,
    events: EventSink,
    stop: Arc<AtomicBool>,
}

impl Crawler {
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent, config.crawler.timeout())?;
        let classifier = Box::new(HeuristicClassifier::new(config.classifier.enable_fallback));
        let verifier = Verifier::with_client(client.clone());
        let robots = RobotsCache::new(
            client.clone(),
            config.user_agent.crawler_name.clone(),
            config.crawler.respect_robots,
        );

        Ok(Self {
            config,
            client,
            classifier,
            verifier,
            robots,
            events: EventSink::disabled(),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Attaches an event sink for progress reporting
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Swaps in a different classifier implementation
    pub fn with_classifier(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Handle for requesting a stop from another task
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs one crawl from the seed and verifies the accumulated candidates
    ///
    /// Every run gets a fresh session; only the robots cache carries over
    /// between runs on the same `Crawler`.
    pub async fn crawl(&mut self, seed: &str) -> crate::Result<CrawlReport> {
        let seed_url = normalize(&ensure_scheme(seed))
            .map_err(|e| ConfigError::InvalidSeed(e.to_string()))?;

        tracing::info!("Starting crawl from {}", seed_url);

        let mut session = CrawlSession::new();
        let mut queue: VecDeque<(Url, u32)> = VecDeque::from([(seed_url.clone(), 0)]);
        let mut host_gate: HashMap<String, Instant> = HashMap::new();
        let mut stopped = false;

        let max_depth = self.config.crawler.max_depth;
        let max_pages = self.config.crawler.max_pages;
        let allow_subdomains = self.config.crawler.allow_subdomains;
        let polite_delay = self.config.crawler.polite_delay();

        while let Some((url, depth)) = queue.pop_front() {
            if self.stop.load(Ordering::Relaxed) {
                stopped = true;
                break;
            }

            if session.counters.pages_crawled >= max_pages {
                tracing::info!("Page limit of {} reached", max_pages);
                break;
            }

            if depth > max_depth {
                self.events.emit(CrawlEvent::PageSkipped {
                    url: url.to_string(),
                    reason: SkipReason::DepthExceeded,
                });
                continue;
            }

            if !session.mark_visited(&url) {
                self.events.emit(CrawlEvent::PageSkipped {
                    url: url.to_string(),
                    reason: SkipReason::AlreadyVisited,
                });
                continue;
            }

            if !self.robots.can_fetch(&url).await {
                tracing::debug!("Robots policy disallows {}", url);
                self.events.emit(CrawlEvent::PageSkipped {
                    url: url.to_string(),
                    reason: SkipReason::RobotsDenied,
                });
                continue;
            }

            polite_wait(&mut host_gate, &url, polite_delay).await;

            // The delay is a yield point; re-check so a stop raised while
            // waiting never triggers another fetch
            if self.stop.load(Ordering::Relaxed) {
                stopped = true;
                break;
            }

            match fetch_page(&self.client, &url).await {
                FetchOutcome::Html {
                    body,
                    final_url,
                    status,
                } => {
                    session.record_page(&final_url, depth);
                    tracing::debug!("Fetched {} at depth {}", final_url, depth);
                    self.events.emit(CrawlEvent::PageFetched {
                        url: final_url.to_string(),
                        depth,
                        status,
                    });

                    for link in extract_links(&body, &final_url) {
                        let mut is_document = false;
                        if let Some(classification) = self.classifier.classify(&link) {
                            // Extension matches are documents, not pages
                            is_document = classification.reasons.contains(&Reason::Extension);
                            let first = session.record_candidate(
                                &link.url,
                                &classification,
                                final_url.as_str(),
                            );
                            if first {
                                self.events.emit(CrawlEvent::CandidateFound {
                                    url: link.url.to_string(),
                                    priority: classification.priority,
                                });
                            }
                        }

                        if is_document {
                            continue;
                        }

                        if same_site(link.url.as_str(), &seed_url, allow_subdomains)
                            && !session.is_visited(&link.url)
                        {
                            queue.push_back((link.url.clone(), depth + 1));
                        }
                    }
                }
                FetchOutcome::NonHtml {
                    content_type,
                    final_url,
                    status,
                } => {
                    session.record_page(&final_url, depth);
                    tracing::debug!(
                        "Non-HTML response from {} ({})",
                        final_url,
                        content_type.as_deref().unwrap_or("unknown")
                    );
                    self.events.emit(CrawlEvent::PageFetched {
                        url: final_url.to_string(),
                        depth,
                        status,
                    });

                    // The URL itself may still be a document candidate
                    let link =
                        ExtractedLink::new(final_url.clone(), "", "", LinkOrigin::Anchor);
                    if let Some(classification) = self.classifier.classify(&link) {
                        let first = session.record_candidate(
                            &final_url,
                            &classification,
                            url.as_str(),
                        );
                        if first {
                            self.events.emit(CrawlEvent::CandidateFound {
                                url: final_url.to_string(),
                                priority: classification.priority,
                            });
                        }
                    }
                }
                FetchOutcome::HttpError { status } => {
                    tracing::warn!("HTTP {} fetching {}", status, url);
                    self.events.emit(CrawlEvent::PageSkipped {
                        url: url.to_string(),
                        reason: SkipReason::FetchFailed,
                    });
                }
                FetchOutcome::NetworkError(err) => {
                    tracing::warn!("Failed to fetch {}: {}", url, err);
                    self.events.emit(CrawlEvent::PageSkipped {
                        url: url.to_string(),
                        reason: SkipReason::FetchFailed,
                    });
                }
            }
        }

        let mut counters = session.counters;
        let (pages, candidates) = session.into_parts();
        let mut verified = Vec::new();

        for candidate in &candidates {
            if self.stop.load(Ordering::Relaxed) {
                stopped = true;
                break;
            }

            match self.verifier.verify(candidate).await {
                Some(doc) => {
                    tracing::info!("Verified {} via {}", doc.final_url, doc.method);
                    self.events.emit(CrawlEvent::CandidateVerified {
                        url: doc.final_url.to_string(),
                        method: doc.method,
                    });
                    verified.push(doc);
                }
                None => {
                    tracing::debug!("Rejected candidate {}", candidate.url);
                    self.events.emit(CrawlEvent::CandidateRejected {
                        url: candidate.url.to_string(),
                        reason: "failed verification".to_string(),
                    });
                }
            }
        }

        counters.verified_count = verified.len();

        if stopped {
            tracing::info!("Crawl stopped by request");
            self.events.emit(CrawlEvent::Stopped);
        } else {
            self.events.emit(CrawlEvent::Completed { counters });
        }

        tracing::info!(
            "Crawl finished: {} pages, {} candidates, {} verified",
            counters.pages_crawled,
            counters.candidates_seen,
            counters.verified_count
        );

        Ok(CrawlReport {
            pages,
            candidates,
            verified,
            counters,
            stopped,
        })
    }
}

/// Sleeps out the remainder of the per-host delay before hitting `url`
async fn polite_wait(gate: &mut HashMap<String, Instant>, url: &Url, delay: Duration) {
    if delay.is_zero() {
        return;
    }

    let host = match url.host_str() {
        Some(h) => h.to_string(),
        None => return,
    };

    if let Some(last) = gate.get(&host) {
        let elapsed = last.elapsed();
        if elapsed < delay {
            tokio::time::sleep(delay - elapsed).await;
        }
    }

    gate.insert(host, Instant::now());
}
