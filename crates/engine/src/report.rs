//! Report sink.
//!
//! Pure aggregation of case outcomes. The orchestrator hands outcomes
//! over already resequenced to registry order, and this is the single
//! writer; nothing here retries or mutates an outcome.

use attest_domain::{CaseOutcome, RunSummary};

/// Accumulates outcomes for one run and produces the summary.
#[derive(Debug, Default)]
pub struct ReportSink {
    outcomes: Vec<CaseOutcome>,
}

impl ReportSink {
    /// Creates an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    /// Records one case outcome.
    pub fn record(&mut self, outcome: CaseOutcome) {
        self.outcomes.push(outcome);
    }

    /// Returns the recorded outcomes in recording order.
    #[must_use]
    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    /// Produces the run summary.
    #[must_use]
    pub fn summarize(&self) -> RunSummary {
        RunSummary::from_outcomes(&self.outcomes)
    }
}
