//! Crawl engine
//!
//! Fetching, link extraction, per-run state, and the breadth-first scheduler
//! that ties them to the classifier, resolver, and verifier.

mod fetcher;
mod parser;
mod scheduler;
mod session;

pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use parser::extract_links;
pub use scheduler::{CrawlReport, Crawler};
pub use session::{CandidateUrl, CrawlCounters, CrawlSession, PageRecord};
