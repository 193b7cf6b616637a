//! Human-readable rendering of scan results.

use std::fmt::Write as _;

use goblin_core::Finding;

use crate::client::ScanReport;

/// Render findings in canonical order, one block per finding.
///
/// Pure formatting: the list is printed exactly as aggregated. Callers
/// should treat an empty list as a distinct, explicit outcome rather than
/// passing it here and printing an empty table.
pub fn render_findings(findings: &[Finding]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "─".repeat(70));
    let _ = writeln!(out, " {} finding(s)", findings.len());
    let _ = writeln!(out, "{}", "─".repeat(70));

    for finding in findings {
        let line = finding
            .location
            .line
            .map(|l| format!(":{l}"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            " [{:>8}] {}{}",
            finding.severity,
            finding.location.path.display(),
            line
        );
        let _ = writeln!(out, "            {}", finding.description);
    }
    out
}

/// One-line summary of a completed run.
pub fn render_summary(report: &ScanReport) -> String {
    format!(
        " session {}: {} file(s) matched, {} streamed ({} in {} chunk(s)), {} skipped, {} warning(s), {:.2}s",
        report.session_id,
        report.stats.files_matched,
        report.stats.files_streamed,
        humansize::format_size(report.stats.bytes_sent, humansize::BINARY),
        report.stats.chunks_sent,
        report.stats.files_skipped,
        report.warnings.len(),
        report.duration.as_secs_f64(),
    )
}
