//! Candidate verification
//!
//! Decides which classified candidates are genuine documents. The checks are
//! ordered from cheapest to most expensive: a document extension on the
//! resolved URL needs no network at all, a HEAD probe settles most of the
//! rest, and only then does a streamed GET read the first body chunk for a
//! `%PDF` signature. Candidates the network cannot settle fall through to
//! priority heuristics, so a dead link is inconclusive rather than fatal.

use crate::classify::{has_document_extension, Priority, Reason};
use crate::crawler::CandidateUrl;
use crate::resolve;
use reqwest::{redirect, Client};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Content types accepted as direct document confirmation
const DOCUMENT_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// How a candidate was confirmed as a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMethod {
    /// The resolved URL carries a document extension; no request was made
    ExtensionMatch,
    /// The HEAD probe carried a document content type
    HeaderConfirmed,
    /// Confirmed on the streamed GET fallback, or by redirects landing on a
    /// URL with a document extension
    RedirectConfirmed,
    /// Accepted on classification strength after inconclusive probes
    HeuristicAccepted,
}

impl fmt::Display for VerifyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ExtensionMatch => "extension-match",
            Self::HeaderConfirmed => "header-confirmed",
            Self::RedirectConfirmed => "redirect-confirmed",
            Self::HeuristicAccepted => "heuristic-accepted",
        };
        write!(f, "{}", s)
    }
}

/// A candidate that passed verification
#[derive(Debug, Clone)]
pub struct VerifiedDocument {
    /// The URL to download from, after resolution and redirects
    pub final_url: Url,
    /// The candidate URL as originally discovered
    pub source_candidate: Url,
    pub method: VerifyMethod,
    /// Status of the confirming response, if a request was made
    pub http_status: Option<u16>,
    pub content_type: Option<String>,
}

/// Outcome of a single HEAD or GET probe
enum Probe {
    /// Response confirms a document
    Confirmed {
        final_url: Url,
        status: u16,
        content_type: Option<String>,
        method: VerifyMethod,
    },
    /// Response proves the candidate is not a document
    Rejected,
    /// Probe could not settle it (HTML response, error, no signature)
    Inconclusive,
}

/// Verifies candidates against the live site
pub struct Verifier {
    client: Client,
}

impl Verifier {
    /// Builds a verifier with its own HTTP client
    pub fn new(user_agent: &str, timeout: Duration) -> crate::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    /// Builds a verifier sharing an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Verifies one candidate, returning `None` when it should be dropped
    ///
    /// The candidate URL is passed through the cloud-link resolver first, so
    /// a Drive viewer link is probed at its direct-download form.
    pub async fn verify(&self, candidate: &CandidateUrl) -> Option<VerifiedDocument> {
        let target = resolve::resolve(&candidate.url);

        // Cheapest check first: a document extension needs no request
        if has_document_extension(target.as_str()) {
            return Some(VerifiedDocument {
                final_url: target,
                source_candidate: candidate.url.clone(),
                method: VerifyMethod::ExtensionMatch,
                http_status: None,
                content_type: None,
            });
        }

        match self.head_probe(&target).await {
            Probe::Confirmed {
                final_url,
                status,
                content_type,
                method,
            } => {
                return Some(VerifiedDocument {
                    final_url,
                    source_candidate: candidate.url.clone(),
                    method,
                    http_status: Some(status),
                    content_type,
                });
            }
            Probe::Rejected => return None,
            Probe::Inconclusive => {}
        }

        match self.get_probe(&target).await {
            Probe::Confirmed {
                final_url,
                status,
                content_type,
                method,
            } => Some(VerifiedDocument {
                final_url,
                source_candidate: candidate.url.clone(),
                method,
                http_status: Some(status),
                content_type,
            }),
            Probe::Rejected => None,
            Probe::Inconclusive => self.heuristic_accept(candidate, target),
        }
    }

    /// HEAD probe: content type and redirect target only
    async fn head_probe(&self, target: &Url) -> Probe {
        let resp = match self.client.head(target.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!("HEAD probe failed for {}: {}", target, e);
                return Probe::Inconclusive;
            }
        };

        let status = resp.status().as_u16();
        let final_url = resp.url().clone();
        let content_type = response_content_type(&resp);

        if !resp.status().is_success() {
            return Probe::Inconclusive;
        }

        if let Some(ct) = content_type.as_deref() {
            if is_document_content_type(ct) {
                return Probe::Confirmed {
                    final_url,
                    status,
                    content_type,
                    method: VerifyMethod::HeaderConfirmed,
                };
            }
        }

        if final_url != *target && has_document_extension(final_url.as_str()) {
            return Probe::Confirmed {
                final_url,
                status,
                content_type,
                method: VerifyMethod::RedirectConfirmed,
            };
        }

        Probe::Inconclusive
    }

    /// Streamed GET probe: headers plus the first body chunk
    ///
    /// A content type claiming PDF must be backed by a `%PDF` prefix; a
    /// mismatch rejects the candidate outright.
    async fn get_probe(&self, target: &Url) -> Probe {
        let resp = match self.client.get(target.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!("GET probe failed for {}: {}", target, e);
                return Probe::Inconclusive;
            }
        };

        let status = resp.status().as_u16();
        let final_url = resp.url().clone();
        let content_type = response_content_type(&resp);

        if !resp.status().is_success() {
            return Probe::Inconclusive;
        }

        if final_url != *target && has_document_extension(final_url.as_str()) {
            return Probe::Confirmed {
                final_url,
                status,
                content_type,
                method: VerifyMethod::RedirectConfirmed,
            };
        }

        let claims_pdf = content_type
            .as_deref()
            .map(|ct| ct == "application/pdf")
            .unwrap_or(false);
        let claims_document = content_type
            .as_deref()
            .map(is_document_content_type)
            .unwrap_or(false);

        // Office types have no short magic worth checking here
        if claims_document && !claims_pdf {
            return Probe::Confirmed {
                final_url,
                status,
                content_type,
                method: VerifyMethod::RedirectConfirmed,
            };
        }

        let mut resp = resp;
        let first_chunk = match resp.chunk().await {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::debug!("Failed to read body from {}: {}", target, e);
                return Probe::Inconclusive;
            }
        };

        let signature = first_chunk
            .as_deref()
            .map(has_pdf_signature)
            .unwrap_or(false);

        match (claims_pdf, signature) {
            // Header and body agree
            (true, true) | (false, true) => Probe::Confirmed {
                final_url,
                status,
                content_type,
                method: VerifyMethod::RedirectConfirmed,
            },
            // Spoofed content type
            (true, false) => {
                tracing::debug!("Content type claims PDF but body lacks signature: {}", target);
                Probe::Rejected
            }
            (false, false) => Probe::Inconclusive,
        }
    }

    /// Accepts or drops a candidate the network could not settle
    fn heuristic_accept(&self, candidate: &CandidateUrl, target: Url) -> Option<VerifiedDocument> {
        let accept = match candidate.priority {
            Priority::High => true,
            Priority::Medium => candidate.reasons.iter().any(|r| {
                matches!(r, Reason::ViewerHost | Reason::ShortenedUrl | Reason::EmbedTag)
            }),
            Priority::Low => false,
        };

        if !accept {
            return None;
        }

        Some(VerifiedDocument {
            final_url: target,
            source_candidate: candidate.url.clone(),
            method: VerifyMethod::HeuristicAccepted,
            http_status: None,
            content_type: None,
        })
    }
}

/// True when the first bytes of a body are the PDF magic
pub fn has_pdf_signature(prefix: &[u8]) -> bool {
    prefix.starts_with(b"%PDF")
}

/// Exact match against the accepted document content types, parameters stripped
fn is_document_content_type(content_type: &str) -> bool {
    let base = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    DOCUMENT_CONTENT_TYPES.contains(&base.as_str())
}

fn response_content_type(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
