use crate::UrlError;
use url::Url;

/// Normalizes a URL for use as a visited-set / candidate-table key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an http or https scheme
/// 3. Remove the fragment (everything after #)
///
/// Scheme, host, path, and query are left intact. The function is idempotent:
/// normalizing an already-normalized URL returns it unchanged.
///
/// # Examples
///
/// ```
/// use docsweep::url::normalize;
///
/// let url = normalize("https://example.com/doc.pdf#view=Fit").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/doc.pdf");
/// ```
pub fn normalize(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Prepends `https://` to a seed URL that was given without a scheme
///
/// Seeds like `example.com/docs` are accepted from the CLI; anything that
/// already carries a scheme is returned unchanged.
pub fn ensure_scheme(seed: &str) -> String {
    let trimmed = seed.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
