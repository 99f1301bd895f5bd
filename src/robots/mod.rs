//! Robots policy module
//!
//! Fetches and caches `/robots.txt` per origin and answers the single
//! question the crawl loop asks: may this URL be fetched? Fetch failures and
//! missing files mean allow-all; a disabled checker always allows. The
//! crawl-delay directive is not consumed here, the scheduler's polite delay
//! applies uniformly.

use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use url::Url;

/// Parsed robots.txt data for one origin
///
/// Thin wrapper over the robotstxt crate's matcher. An empty content string
/// means everything is allowed.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    content: String,
}

impl ParsedRobots {
    /// Creates a ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// Used as the default when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// Checks if a URL is allowed for the given user agent
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }
        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}

/// Per-origin robots.txt checker with an in-run cache
pub struct RobotsCache {
    client: Client,
    user_agent: String,
    enabled: bool,
    cache: HashMap<String, ParsedRobots>,
}

impl RobotsCache {
    pub fn new(client: Client, user_agent: String, enabled: bool) -> Self {
        Self {
            client,
            user_agent,
            enabled,
            cache: HashMap::new(),
        }
    }

    /// Checks whether the policy permits fetching the given URL
    ///
    /// The first check per origin fetches `/robots.txt`; later checks hit the
    /// cache. Anything other than a 200 response yields allow-all for that
    /// origin.
    pub async fn can_fetch(&mut self, url: &Url) -> bool {
        if !self.enabled {
            return true;
        }

        let origin = match origin_key(url) {
            Some(o) => o,
            None => return true,
        };

        if !self.cache.contains_key(&origin) {
            let robots = self.fetch_robots(&origin).await;
            self.cache.insert(origin.clone(), robots);
        }

        self.cache
            .get(&origin)
            .map(|r| r.is_allowed(url.as_str(), &self.user_agent))
            .unwrap_or(true)
    }

    async fn fetch_robots(&self, origin: &str) -> ParsedRobots {
        let robots_url = format!("{}/robots.txt", origin);
        tracing::debug!("Fetching robots.txt from {}", robots_url);

        match self.client.get(&robots_url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(body) => ParsedRobots::from_content(&body),
                Err(e) => {
                    tracing::debug!("Failed to read robots.txt body from {}: {}", robots_url, e);
                    ParsedRobots::allow_all()
                }
            },
            Ok(resp) => {
                tracing::debug!("robots.txt at {} returned {}", robots_url, resp.status());
                ParsedRobots::allow_all()
            }
            Err(e) => {
                tracing::debug!("Failed to fetch robots.txt from {}: {}", robots_url, e);
                ParsedRobots::allow_all()
            }
        }
    }
}

/// Builds the `scheme://host[:port]` cache key for a URL
fn origin_key(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}
