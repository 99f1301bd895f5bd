//! Text report rendering
//!
//! Turns a finished `CrawlReport` into the plain-text summary the CLI prints.
//! Structured export formats live outside this crate; this is the simple
//! result record.

use crate::crawler::CrawlReport;
use std::fmt::Write;

/// Renders the full run report as printable text
pub fn render_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    let status = if report.stopped {
        "stopped early"
    } else {
        "completed"
    };

    // Writes to a String cannot fail
    let _ = writeln!(out, "Crawl {}", status);
    let _ = writeln!(out, "  pages crawled:      {}", report.counters.pages_crawled);
    let _ = writeln!(out, "  candidates found:   {}", report.counters.candidates_seen);
    let _ = writeln!(out, "  documents verified: {}", report.counters.verified_count);

    if !report.candidates.is_empty() {
        let _ = writeln!(out, "\nCandidates:");
        for candidate in &report.candidates {
            let reasons: Vec<String> =
                candidate.reasons.iter().map(|r| r.to_string()).collect();
            let _ = writeln!(
                out,
                "  [{}] {} ({})",
                candidate.priority,
                candidate.url,
                reasons.join(", ")
            );
            for page in &candidate.found_on {
                let _ = writeln!(out, "      found on {}", page);
            }
        }
    }

    if !report.verified.is_empty() {
        let _ = writeln!(out, "\nVerified documents:");
        for doc in &report.verified {
            let _ = writeln!(out, "  {} ({})", doc.final_url, doc.method);
            if doc.final_url != doc.source_candidate {
                let _ = writeln!(out, "      from {}", doc.source_candidate);
            }
            if let Some(ct) = &doc.content_type {
                let _ = writeln!(out, "      content-type {}", ct);
            }
        }
    }

    out
}
