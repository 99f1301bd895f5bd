//! Candidate classifier
//!
//! Given a link (URL plus the text and context it was found with), decides
//! whether it looks like a document and why. Signals are evaluated in rule
//! order; a URL matched by several rules accumulates every reason tag but
//! keeps only the single highest priority.

mod rules;

pub use rules::has_document_extension;

use rules::{
    has_doc_keyword, has_viewer_path, is_shortener_host, is_social_host, is_viewer_host,
    value_mentions_document, CARRIER_PARAMS,
};
use std::collections::BTreeSet;
use std::fmt;
use url::Url;

/// Where in the page a link was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOrigin {
    /// An `<a href>` anchor
    Anchor,
    /// `<embed src>`
    Embed,
    /// `<object data>`
    Object,
    /// `<iframe src>`
    Iframe,
    /// Matched by the inline-URL regex in the raw page body
    Inline,
}

impl LinkOrigin {
    /// Embedded-content origins are an intrinsically reliable document signal
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embed | Self::Object | Self::Iframe)
    }
}

/// A link extracted from a fetched page, ready for classification
#[derive(Debug, Clone)]
pub struct ExtractedLink {
    /// Absolute, normalized URL
    pub url: Url,
    /// The link's own text (empty for embeds and inline matches)
    pub text: String,
    /// Text of the surrounding element
    pub context: String,
    /// Where the link came from
    pub origin: LinkOrigin,
}

impl ExtractedLink {
    pub fn new(url: Url, text: &str, context: &str, origin: LinkOrigin) -> Self {
        Self {
            url,
            text: text.trim().to_string(),
            context: context.trim().to_string(),
            origin,
        }
    }
}

/// Candidate priority, ordered Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// Why a URL was classified as document-looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Reason {
    /// Path or query ends with .pdf/.doc/.docx
    Extension,
    /// URL was the src/data of an embed, object, or iframe
    EmbedTag,
    /// A carrier query parameter holds a document reference
    QueryParam,
    /// Known cloud-storage/viewer host or viewer path
    ViewerHost,
    /// URL-shortener host combined with a document keyword
    ShortenedUrl,
    /// Link text itself indicates a document
    TextHint,
    /// Catch-all: plausible anchor accepted at lowest priority
    Fallback,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Extension => "extension",
            Self::EmbedTag => "embed-tag",
            Self::QueryParam => "query-param",
            Self::ViewerHost => "viewer-host",
            Self::ShortenedUrl => "shortened-url",
            Self::TextHint => "text-hint",
            Self::Fallback => "fallback",
        };
        write!(f, "{}", s)
    }
}

/// Result of classifying a single link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Every rule that matched; never empty
    pub reasons: BTreeSet<Reason>,
    /// Maximum priority across the matched rules
    pub priority: Priority,
}

/// Capability seam for the crawl scheduler: implementations decide which
/// links count as document candidates
pub trait Classifier: Send + Sync {
    /// Returns `None` when the link does not look like a document
    fn classify(&self, link: &ExtractedLink) -> Option<Classification>;
}

/// The multi-signal heuristic classifier
///
/// The catch-all fallback rule trades precision for recall (it accepts almost
/// any anchor with alphabetic text) and is therefore switchable rather than
/// hard-coded.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    fallback_enabled: bool,
}

impl HeuristicClassifier {
    pub fn new(fallback_enabled: bool) -> Self {
        Self { fallback_enabled }
    }
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Classifier for HeuristicClassifier {
    fn classify(&self, link: &ExtractedLink) -> Option<Classification> {
        let mut matches: Vec<(Reason, Priority)> = Vec::new();
        let url_str = link.url.as_str();
        let text_lower = link.text.to_lowercase();

        // Rule 1: document extension in path or query
        if has_document_extension(url_str) {
            matches.push((Reason::Extension, Priority::High));
        }

        // Rule 2: embedded-content tags
        if link.origin.is_embedded() {
            matches.push((Reason::EmbedTag, Priority::High));
        }

        // Rule 3: carrier query parameter with a document-looking value
        for (key, value) in link.url.query_pairs() {
            if CARRIER_PARAMS.contains(&key.to_lowercase().as_str())
                && value_mentions_document(&value)
            {
                matches.push((Reason::QueryParam, Priority::Medium));
                break;
            }
        }

        // Rule 4: viewer/storage host or viewer path; a document keyword in
        // the link or context text escalates to high
        if is_viewer_host(&link.url) || has_viewer_path(&link.url) {
            let priority = if has_doc_keyword(&link.text) || has_doc_keyword(&link.context) {
                Priority::High
            } else {
                Priority::Medium
            };
            matches.push((Reason::ViewerHost, priority));
        }

        // Rule 5: shortened URL plus a document keyword
        if is_shortener_host(&link.url)
            && (has_doc_keyword(&link.text) || has_doc_keyword(&link.context))
        {
            matches.push((Reason::ShortenedUrl, Priority::Medium));
        }

        // Rule 6: the link text itself ("pdf" literally beats generic keywords)
        if text_lower.contains("pdf") {
            matches.push((Reason::TextHint, Priority::High));
        } else if has_doc_keyword(&link.text) {
            matches.push((Reason::TextHint, Priority::Medium));
        }

        // Rule 7: catch-all, only when nothing else matched
        if matches.is_empty()
            && self.fallback_enabled
            && link.origin == LinkOrigin::Anchor
            && link.text.len() > 3
            && link.text.chars().any(|c| c.is_alphabetic())
            && !is_social_host(&link.url)
        {
            matches.push((Reason::Fallback, Priority::Low));
        }

        if matches.is_empty() {
            return None;
        }

        let priority = matches
            .iter()
            .map(|(_, p)| *p)
            .max()
            .unwrap_or(Priority::Low);
        let reasons: BTreeSet<Reason> = matches.into_iter().map(|(r, _)| r).collect();

        Some(Classification { reasons, priority })
    }
}
