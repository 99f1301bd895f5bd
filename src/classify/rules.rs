//! Fixed vocabularies and URL-shape helpers backing the classifier rules.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Document extensions at the end of a path or query, optionally followed by
/// `?` or `#`. Case-insensitive.
static DOC_EXT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(?:pdf|docx?)(?:$|[?#])").expect("valid regex"));

/// Query parameters that commonly carry a document reference in their value
pub const CARRIER_PARAMS: &[&str] = &[
    "file", "url", "resource", "src", "document", "format", "type", "export", "output", "download",
    "doc",
];

/// Cloud-storage and viewer hosts known to front documents
const VIEWER_HOSTS: &[&str] = &[
    "drive.google.com",
    "docs.google.com",
    "sites.google.com",
    "googleusercontent.com",
    "dropbox.com",
    "dropboxusercontent.com",
    "db.tt",
    "onedrive.live.com",
    "1drv.ms",
    "sharepoint.com",
    "box.com",
    "box.net",
    "amazonaws.com",
    "cloudfront.net",
    "icloud.com",
    "wetransfer.com",
    "we.tl",
    "mediafire.com",
    "mega.nz",
    "mega.co.nz",
];

/// Host prefixes typical of asset/CDN subdomains
const CDN_PREFIXES: &[&str] = &[
    "cdn.",
    "assets.",
    "static.",
    "files.",
    "downloads.",
    "media.",
    "content.",
    "resources.",
];

/// Path fragments typical of in-browser document viewers
const VIEWER_PATH_HINTS: &[&str] = &["/viewer", "/embed", "/preview", "/view", "render", "pdfjs"];

/// URL-shortener hosts
const SHORTENER_HOSTS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "t.co",
    "goo.gl",
    "ow.ly",
    "short.link",
    "rebrand.ly",
    "cutt.ly",
    "is.gd",
    "buff.ly",
    "ift.tt",
    "tiny.cc",
    "lnkd.in",
    "trib.al",
    "po.st",
    "v.gd",
];

/// Social-media hosts excluded from the fallback rule
const SOCIAL_HOSTS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "youtube.com",
    "tiktok.com",
];

/// Link/context keywords that suggest a document target
const DOC_KEYWORDS: &[&str] = &[
    "handbook",
    "manual",
    "guide",
    "document",
    "report",
    "brochure",
    "catalog",
    "specification",
    "datasheet",
    "whitepaper",
    "policy",
    "instructions",
    "procedures",
    "guidelines",
    "standards",
    "forms",
    "application",
    "enrollment",
    "registration",
    "syllabus",
    "curriculum",
    "schedule",
    "calendar",
    "newsletter",
    "minutes",
    "agenda",
    "download",
];

/// Checks if a URL string ends (in path or query) with a document extension
pub fn has_document_extension(url_str: &str) -> bool {
    DOC_EXT_REGEX.is_match(url_str)
}

/// Checks if a string mentions a document extension or the literal "pdf"
pub fn value_mentions_document(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.contains(".pdf") || lower.contains(".doc") || lower.contains("pdf")
}

/// Checks if text contains any keyword from the document vocabulary
pub fn has_doc_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    DOC_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Matches a host against a fixed list by exact or dot-suffix comparison
fn host_in_list(host: &str, list: &[&str]) -> bool {
    list.iter()
        .any(|entry| host == *entry || host.ends_with(&format!(".{}", entry)))
}

/// Checks if a URL points at a known cloud-storage/viewer host or an asset CDN
pub fn is_viewer_host(url: &Url) -> bool {
    let host = match url.host_str() {
        Some(h) => h.to_lowercase(),
        None => return false,
    };
    host_in_list(&host, VIEWER_HOSTS)
        || host.contains(".s3.")
        || CDN_PREFIXES.iter().any(|p| host.starts_with(p))
}

/// Checks if a URL's path contains a viewer hint
pub fn has_viewer_path(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    VIEWER_PATH_HINTS.iter().any(|hint| path.contains(hint))
}

/// Checks if a URL points at a known URL shortener
pub fn is_shortener_host(url: &Url) -> bool {
    match url.host_str() {
        Some(h) => host_in_list(&h.to_lowercase(), SHORTENER_HOSTS),
        None => false,
    }
}

/// Checks if a URL points at a social-media host
pub fn is_social_host(url: &Url) -> bool {
    match url.host_str() {
        Some(h) => host_in_list(&h.to_lowercase(), SOCIAL_HOSTS),
        None => false,
    }
}
