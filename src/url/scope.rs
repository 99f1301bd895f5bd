use url::Url;

/// Checks whether a URL belongs to the same site as the crawl base
///
/// Both hosts are lowercased and have a leading "www." stripped before
/// comparison. With `allow_subdomains` the candidate matches when its host is
/// equal to the base host or is a dot-suffix of it (`docs.example.com` against
/// `example.com`); otherwise only an exact match counts.
///
/// Pure function with no error cases: anything unparseable compares as
/// unequal.
///
/// # Examples
///
/// ```
/// use docsweep::url::same_site;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// assert!(same_site("https://docs.example.com/x", &base, true));
/// assert!(!same_site("https://docs.example.com/x", &base, false));
/// assert!(!same_site("https://other.com/x", &base, true));
/// ```
pub fn same_site(url_str: &str, base: &Url, allow_subdomains: bool) -> bool {
    let candidate_host = match Url::parse(url_str).ok().and_then(host_root) {
        Some(h) => h,
        None => return false,
    };
    let base_host = match host_root(base.clone()) {
        Some(h) => h,
        None => return false,
    };

    if candidate_host == base_host {
        return true;
    }
    allow_subdomains && candidate_host.ends_with(&format!(".{}", base_host))
}

/// Lowercases a URL's host and strips a leading "www." prefix
fn host_root(url: Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(u: &str) -> Url {
        Url::parse(u).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let b = base("https://example.com/");
        assert!(same_site("https://example.com/page", &b, false));
        assert!(same_site("https://example.com/page", &b, true));
    }

    #[test]
    fn test_www_stripped_both_sides() {
        let b = base("https://www.example.com/");
        assert!(same_site("https://example.com/page", &b, false));
        assert!(same_site("https://www.example.com/page", &b, false));
    }

    #[test]
    fn test_subdomain_allowed() {
        let b = base("https://example.com");
        assert!(same_site("https://docs.example.com/x", &b, true));
        assert!(same_site("https://a.b.example.com/x", &b, true));
    }

    #[test]
    fn test_subdomain_rejected_when_disallowed() {
        let b = base("https://example.com");
        assert!(!same_site("https://docs.example.com/x", &b, false));
    }

    #[test]
    fn test_different_site() {
        let b = base("https://other.com");
        assert!(!same_site("https://docs.example.com/x", &b, true));
    }

    #[test]
    fn test_no_partial_host_match() {
        let b = base("https://example.com");
        assert!(!same_site("https://notexample.com/x", &b, true));
        assert!(!same_site("https://example.com.evil.org/x", &b, true));
    }

    #[test]
    fn test_malformed_url_is_unequal() {
        let b = base("https://example.com");
        assert!(!same_site("not a url", &b, true));
        assert!(!same_site("", &b, true));
    }
}
