//! Page fetching
//!
//! One shared HTTP client for the whole run, and a fetch routine that sorts
//! responses into the cases the crawl loop cares about: HTML to parse,
//! non-HTML to classify by URL shape, and the two failure flavors.

use crate::config::UserAgentConfig;
use reqwest::{redirect, Client};
use std::time::Duration;
use url::Url;

/// What came back from fetching a queued page
#[derive(Debug)]
pub enum FetchOutcome {
    /// An HTML page to extract links from
    Html {
        body: String,
        /// URL after redirects; relative links resolve against this
        final_url: Url,
        status: u16,
    },
    /// Something other than HTML (the URL itself may still be a candidate)
    NonHtml {
        content_type: Option<String>,
        final_url: Url,
        status: u16,
    },
    /// Server answered with a non-success status
    HttpError { status: u16 },
    /// Timeout, connection failure, or a body read error
    NetworkError(String),
}

/// Builds the client shared by the crawl loop and the robots checker
pub fn build_http_client(user_agent: &UserAgentConfig, timeout: Duration) -> crate::Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .redirect(redirect::Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()?;
    Ok(client)
}

/// Fetches one page and sorts the response
pub async fn fetch_page(client: &Client, url: &Url) -> FetchOutcome {
    let resp = match client.get(url.clone()).send().await {
        Ok(resp) => resp,
        Err(e) => return FetchOutcome::NetworkError(e.to_string()),
    };

    let status = resp.status().as_u16();
    if !resp.status().is_success() {
        return FetchOutcome::HttpError { status };
    }

    let final_url = resp.url().clone();
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    if !is_html(content_type.as_deref()) {
        return FetchOutcome::NonHtml {
            content_type,
            final_url,
            status,
        };
    }

    match resp.text().await {
        Ok(body) => FetchOutcome::Html {
            body,
            final_url,
            status,
        },
        Err(e) => FetchOutcome::NetworkError(e.to_string()),
    }
}

/// A missing content type is assumed to be HTML, matching what small sites do
fn is_html(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(ct) => {
            let base = ct.split(';').next().unwrap_or("").trim().to_lowercase();
            base == "text/html" || base == "application/xhtml+xml"
        }
    }
}
