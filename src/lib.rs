//! Docsweep: a document discovery crawler
//!
//! This crate crawls a website breadth-first from a seed page, classifies
//! every discovered link against a set of document heuristics, rewrites known
//! cloud-storage/viewer URLs into direct-download form, and verifies which
//! candidates are genuine documents via lightweight header probes.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod events;
pub mod output;
pub mod resolve;
pub mod robots;
pub mod url;
pub mod verify;

use thiserror::Error;

/// Main error type for Docsweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Docsweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classify::{Classification, Classifier, HeuristicClassifier, Priority, Reason};
pub use config::Config;
pub use crawler::{CrawlCounters, CrawlReport, Crawler};
pub use events::{CrawlEvent, EventSink};
pub use url::{ensure_scheme, normalize, same_site};
pub use verify::{VerifiedDocument, Verifier, VerifyMethod};
