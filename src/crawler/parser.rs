//! Link extraction
//!
//! Pulls every classifiable link out of a fetched HTML page: anchors (with
//! their text and surrounding context), embedded content tags, `<link>`
//! elements, and finally a regex sweep over the raw body that catches
//! document URLs sitting in scripts or unparsed markup.

use crate::classify::{ExtractedLink, LinkOrigin};
use crate::url::normalize;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static EMBED_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("embed[src]").unwrap());
static OBJECT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("object[data]").unwrap());
static IFRAME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("iframe[src]").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("link[href]").unwrap());

/// Document URLs embedded in scripts or attributes the DOM pass misses
static INLINE_DOC_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>()\\]+\.(?:pdf|docx?)(?:\?[^\s"'<>()\\]*)?"#).unwrap()
});

/// Context text is capped so one giant wrapper div does not dominate
const MAX_CONTEXT_LEN: usize = 200;

/// Extracts every link from a page, absolute and normalized
///
/// Relative references resolve against `base` (the post-redirect page URL).
/// Unfetchable schemes (`javascript:`, `mailto:`, `tel:`, `data:`) and
/// fragment-only hrefs are dropped here so the classifier never sees them.
pub fn extract_links(html: &str, base: &Url) -> Vec<ExtractedLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        if let Some(href) = element.value().attr("href") {
            if let Some(url) = resolve_href(href, base) {
                let text: String = element.text().collect::<Vec<_>>().join(" ");
                let context = parent_context(&element);
                seen.insert(url.as_str().to_string());
                links.push(ExtractedLink::new(url, &text, &context, LinkOrigin::Anchor));
            }
        }
    }

    let embed_sources: [(&Lazy<Selector>, &str, LinkOrigin); 3] = [
        (&EMBED_SELECTOR, "src", LinkOrigin::Embed),
        (&OBJECT_SELECTOR, "data", LinkOrigin::Object),
        (&IFRAME_SELECTOR, "src", LinkOrigin::Iframe),
    ];
    for (selector, attr, origin) in embed_sources {
        for element in document.select(selector) {
            if let Some(value) = element.value().attr(attr) {
                if let Some(url) = resolve_href(value, base) {
                    seen.insert(url.as_str().to_string());
                    links.push(ExtractedLink::new(url, "", "", origin));
                }
            }
        }
    }

    for element in document.select(&LINK_SELECTOR) {
        if let Some(href) = element.value().attr("href") {
            if let Some(url) = resolve_href(href, base) {
                if seen.insert(url.as_str().to_string()) {
                    links.push(ExtractedLink::new(url, "", "", LinkOrigin::Anchor));
                }
            }
        }
    }

    // Raw-body sweep, skipping anything the DOM pass already produced
    for m in INLINE_DOC_URL.find_iter(html) {
        if let Ok(url) = normalize(m.as_str()) {
            if seen.insert(url.as_str().to_string()) {
                links.push(ExtractedLink::new(url, "", "", LinkOrigin::Inline));
            }
        }
    }

    links
}

/// Resolves an href against the page base, filtering unfetchable schemes
fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    let trimmed = href.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let lower = trimmed.to_lowercase();
    for scheme in ["javascript:", "mailto:", "tel:", "data:"] {
        if lower.starts_with(scheme) {
            return None;
        }
    }

    let joined = base.join(trimmed).ok()?;
    normalize(joined.as_str()).ok()
}

/// Text of the anchor's parent element, as classification context
fn parent_context(element: &ElementRef) -> String {
    let parent = match element.parent().and_then(ElementRef::wrap) {
        Some(p) => p,
        None => return String::new(),
    };

    let text: String = parent.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.len() > MAX_CONTEXT_LEN {
        // Truncate on a char boundary
        let mut end = MAX_CONTEXT_LEN;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text[..end].to_string()
    } else {
        text
    }
}
