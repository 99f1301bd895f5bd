use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Docsweep
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the seed URL
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of pages to fetch in one run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Request timeout in seconds
    #[serde(rename = "timeout", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Polite delay between requests to the same host (milliseconds)
    #[serde(rename = "polite-delay", default = "default_polite_delay_ms")]
    pub polite_delay_ms: u64,

    /// Whether subdomains of the seed host are in scope
    #[serde(rename = "allow-subdomains", default = "default_true")]
    pub allow_subdomains: bool,

    /// Whether to consult robots.txt before fetching pages
    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn polite_delay(&self) -> Duration {
        Duration::from_millis(self.polite_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            timeout_secs: default_timeout_secs(),
            polite_delay_ms: default_polite_delay_ms(),
            allow_subdomains: true,
            respect_robots: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        if self.contact_url.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, self.contact_url
            )
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: String::new(),
        }
    }
}

/// Classifier tuning configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Whether the low-priority catch-all rule is active. The rule trades
    /// precision for recall; disable it for precise runs.
    #[serde(rename = "enable-fallback", default = "default_true")]
    pub enable_fallback: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enable_fallback: true,
        }
    }
}

fn default_max_depth() -> u32 {
    3
}

fn default_max_pages() -> usize {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_polite_delay_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_crawler_name() -> String {
    "docsweep".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
