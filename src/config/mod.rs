//! Configuration module for Docsweep
//!
//! Handles loading, parsing, and validating TOML configuration files. All
//! values have defaults, so the config file is optional; CLI flags override
//! whatever the file provides.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{ClassifierConfig, Config, CrawlerConfig, UserAgentConfig};
