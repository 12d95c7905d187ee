//! Human-readable run reporting.

use std::fmt::Write;

use attest_domain::RunSummary;

/// Renders the final summary: every failing case with its violated
/// predicates, then the aggregate counts.
#[must_use]
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    for failure in &summary.failures {
        let _ = writeln!(out, "FAIL {}", failure.case_id);
        for message in &failure.messages {
            let _ = writeln!(out, "  - {message}");
        }
    }

    if summary.all_passed() {
        let _ = writeln!(out, "ok: {} passed, {} total", summary.passed, summary.total);
    } else {
        let _ = writeln!(
            out,
            "FAILED: {} passed, {} failed, {} total",
            summary.passed, summary.failed, summary.total
        );
    }

    out
}
