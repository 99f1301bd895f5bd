//! Cloud-link resolver
//!
//! Rewrites known storage/viewer share URLs into best-effort direct-download
//! URLs using pure string/URL transforms. No network calls are made here:
//! anything this module cannot rewrite (unknown host, missing token,
//! malformed input) is returned unchanged, never raised. Short links like
//! `1drv.ms` are deliberately left alone for the verifier's redirect
//! following.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static DRIVE_FILE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/file/d/([A-Za-z0-9_-]+)").expect("valid regex"));

/// Rewrites a viewer/share URL into a direct-download URL when a
/// provider-specific pattern is recognized; otherwise returns the input
pub fn resolve(url: &Url) -> Url {
    let host = match url.host_str() {
        Some(h) => h.to_lowercase(),
        None => return url.clone(),
    };

    if host == "drive.google.com" {
        resolve_drive(url)
    } else if host == "dropbox.com" || host.ends_with(".dropbox.com") {
        resolve_dropbox(url)
    } else if host == "onedrive.live.com" || host == "sharepoint.com" || host.ends_with(".sharepoint.com")
    {
        resolve_onedrive(url)
    } else {
        url.clone()
    }
}

/// Google Drive: extract a file id from `/file/d/<id>/`, `open?id=` or
/// `uc?id=` forms and rebuild as a `uc?export=download` URL, carrying over a
/// `resourcekey` parameter when one is present
fn resolve_drive(url: &Url) -> Url {
    let file_id = DRIVE_FILE_ID
        .captures(url.path())
        .map(|c| c[1].to_string())
        .or_else(|| {
            let path = url.path();
            if path == "/open" || path == "/uc" {
                url.query_pairs()
                    .find(|(k, _)| k == "id")
                    .map(|(_, v)| v.to_string())
            } else {
                None
            }
        });

    let file_id = match file_id {
        Some(id) => id,
        None => return url.clone(),
    };

    let mut rebuilt = url.clone();
    rebuilt.set_path("/uc");
    rebuilt.set_query(None);
    rebuilt.set_fragment(None);
    rebuilt
        .query_pairs_mut()
        .append_pair("export", "download")
        .append_pair("id", &file_id);
    // append_pair re-encodes the decoded key, so reserved characters survive
    if let Some((_, key)) = url.query_pairs().find(|(k, _)| k == "resourcekey") {
        rebuilt.query_pairs_mut().append_pair("resourcekey", &key);
    }

    rebuilt
}

/// Dropbox share links: force `dl=1` on `/s/`, `/sh/` and `/scl/fi/` paths
fn resolve_dropbox(url: &Url) -> Url {
    let path = url.path();
    if !(path.starts_with("/s/") || path.starts_with("/sh/") || path.starts_with("/scl/fi/")) {
        return url.clone();
    }

    let s = url.as_str();
    let rewritten = if s.contains("?dl=0") || s.contains("&dl=0") {
        s.replace("dl=0", "dl=1")
    } else if s.contains("dl=1") {
        return url.clone();
    } else {
        let separator = if url.query().is_some() { '&' } else { '?' };
        format!("{}{}dl=1", s, separator)
    };

    Url::parse(&rewritten).unwrap_or_else(|_| url.clone())
}

/// OneDrive/SharePoint: `redir?resid=` gets `download=1`, `view.aspx`
/// becomes `download.aspx`, and generic SharePoint URLs get `download=1`
/// appended when absent
fn resolve_onedrive(url: &Url) -> Url {
    let s = url.as_str();
    let host = url.host_str().unwrap_or_default().to_lowercase();

    let rewritten = if host == "onedrive.live.com" {
        if url.path().starts_with("/redir") && s.contains("resid=") {
            let separator = if url.query().is_some() { '&' } else { '?' };
            format!("{}{}download=1", s, separator)
        } else if s.contains("view.aspx") {
            s.replace("view.aspx", "download.aspx")
        } else {
            return url.clone();
        }
    } else {
        // sharepoint.com and tenant subdomains
        if s.contains("download=1") {
            return url.clone();
        }
        let separator = if url.query().is_some() { '&' } else { '?' };
        format!("{}{}download=1", s, separator)
    };

    Url::parse(&rewritten).unwrap_or_else(|_| url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_str(s: &str) -> String {
        resolve(&Url::parse(s).unwrap()).to_string()
    }

    #[test]
    fn test_drive_file_path_form() {
        let out = resolve_str("https://drive.google.com/file/d/ABC123/view");
        assert!(out.contains("uc?export=download&id=ABC123"));
    }

    #[test]
    fn test_drive_open_id_form() {
        let out = resolve_str("https://drive.google.com/open?id=XYZ-9_8");
        assert_eq!(out, "https://drive.google.com/uc?export=download&id=XYZ-9_8");
    }

    #[test]
    fn test_drive_uc_id_form() {
        let out = resolve_str("https://drive.google.com/uc?id=QQ11");
        assert_eq!(out, "https://drive.google.com/uc?export=download&id=QQ11");
    }

    #[test]
    fn test_drive_preserves_resourcekey() {
        let out = resolve_str("https://drive.google.com/file/d/ABC/view?resourcekey=0-key");
        assert!(out.contains("id=ABC"));
        assert!(out.contains("resourcekey=0-key"));
    }

    #[test]
    fn test_drive_resourcekey_reserved_chars_round_trip() {
        let out = resolve_str("https://drive.google.com/file/d/ABC/view?resourcekey=0-a%2Fb%26c");
        assert!(out.contains("resourcekey=0-a%2Fb%26c"));
    }

    #[test]
    fn test_drive_folder_unchanged() {
        let input = "https://drive.google.com/drive/folders/ABC123";
        assert_eq!(resolve_str(input), input);
    }

    #[test]
    fn test_dropbox_dl0_becomes_dl1() {
        let out = resolve_str("https://www.dropbox.com/s/xyz/file.pdf?dl=0");
        assert_eq!(out, "https://www.dropbox.com/s/xyz/file.pdf?dl=1");
    }

    #[test]
    fn test_dropbox_appends_dl1_without_query() {
        let out = resolve_str("https://www.dropbox.com/sh/folder/token");
        assert_eq!(out, "https://www.dropbox.com/sh/folder/token?dl=1");
    }

    #[test]
    fn test_dropbox_appends_dl1_with_existing_query() {
        let out = resolve_str("https://www.dropbox.com/scl/fi/abc/f.pdf?rlkey=r1");
        assert_eq!(out, "https://www.dropbox.com/scl/fi/abc/f.pdf?rlkey=r1&dl=1");
    }

    #[test]
    fn test_dropbox_dl1_left_alone() {
        let input = "https://www.dropbox.com/s/xyz/file.pdf?dl=1";
        assert_eq!(resolve_str(input), input);
    }

    #[test]
    fn test_dropbox_other_paths_unchanged() {
        let input = "https://www.dropbox.com/home/folder";
        assert_eq!(resolve_str(input), input);
    }

    #[test]
    fn test_onedrive_short_link_unchanged() {
        let input = "https://1drv.ms/b/s!token";
        assert_eq!(resolve_str(input), input);
    }

    #[test]
    fn test_onedrive_redir_gets_download() {
        let out = resolve_str("https://onedrive.live.com/redir?resid=ABC!123");
        assert!(out.ends_with("&download=1"));
    }

    #[test]
    fn test_onedrive_view_becomes_download() {
        let out = resolve_str("https://onedrive.live.com/view.aspx?resid=ABC");
        assert!(out.contains("download.aspx"));
        assert!(!out.contains("view.aspx"));
    }

    #[test]
    fn test_sharepoint_appends_download() {
        let out = resolve_str("https://contoso.sharepoint.com/sites/docs/handbook");
        assert_eq!(
            out,
            "https://contoso.sharepoint.com/sites/docs/handbook?download=1"
        );
    }

    #[test]
    fn test_sharepoint_existing_download_unchanged() {
        let input = "https://contoso.sharepoint.com/doc?download=1";
        assert_eq!(resolve_str(input), input);
    }

    #[test]
    fn test_unknown_host_unchanged() {
        let input = "https://example.com/report.pdf";
        assert_eq!(resolve_str(input), input);
    }
}
