//! Execution results, case outcomes, and run summaries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::case::CaseId;
use crate::response::ResponseSnapshot;

/// The result of executing a single case's request.
///
/// Produced once per case per run, consumed by the assertion engine,
/// then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Identifier of the executed case.
    pub case_id: CaseId,
    /// Wall-clock time from dispatch to full response receipt, measured
    /// on a monotonic clock. For a timed-out case this is the elapsed
    /// time at cutoff.
    #[serde(with = "duration_millis")]
    pub latency: Duration,
    /// What the request produced.
    pub response: ResponseOutcome,
}

impl ExecutionResult {
    /// Returns the latency in whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn latency_ms(&self) -> u64 {
        // Truncation is acceptable: realistic latencies fit in u64 millis
        self.latency.as_millis() as u64
    }

    /// Returns the response snapshot if the request completed.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&ResponseSnapshot> {
        match &self.response {
            ResponseOutcome::Completed { response } => Some(response),
            _ => None,
        }
    }
}

/// Disposition of one executed request.
///
/// Status codes in the 4xx/5xx range are `Completed` responses: contract
/// tests assert on expected error responses as first-class outcomes.
/// Only transport-level events get their own variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseOutcome {
    /// A response arrived, whatever its status code.
    Completed {
        /// The received response.
        response: ResponseSnapshot,
    },
    /// The per-case timeout elapsed before the response arrived.
    TimedOut {
        /// The timeout limit that was exceeded, in milliseconds.
        limit_ms: u64,
    },
    /// The request failed below HTTP: DNS, connection, or TLS.
    TransportFailed {
        /// Classified failure description from the transport adapter.
        message: String,
    },
}

/// The recorded pass/fail result of evaluating one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Identifier of the evaluated case.
    pub case_id: CaseId,
    /// Whether every predicate held.
    pub passed: bool,
    /// Messages for each violated predicate, in evaluation order.
    pub failures: Vec<String>,
}

impl CaseOutcome {
    /// Creates a passing outcome.
    #[must_use]
    pub const fn pass(case_id: CaseId) -> Self {
        Self {
            case_id,
            passed: true,
            failures: Vec::new(),
        }
    }

    /// Creates a failing outcome from the violated predicates' messages.
    #[must_use]
    pub fn fail(case_id: CaseId, failures: Vec<String>) -> Self {
        Self {
            case_id,
            passed: false,
            failures,
        }
    }
}

/// One failing case with its violated predicates, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFailure {
    /// Identifier of the failing case.
    pub case_id: CaseId,
    /// Messages for each violated predicate.
    pub messages: Vec<String>,
}

/// Aggregated result of one run.
///
/// `failures` mirrors registry ordering regardless of completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of cases evaluated.
    pub total: usize,
    /// Number of passing cases.
    pub passed: usize,
    /// Number of failing cases.
    pub failed: usize,
    /// Every failing case with its messages, in registry order.
    pub failures: Vec<CaseFailure>,
}

impl RunSummary {
    /// Builds a summary from recorded outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[CaseOutcome]) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed).count();
        let failed = total - passed;
        let failures = outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(|o| CaseFailure {
                case_id: o.case_id.clone(),
                messages: o.failures.clone(),
            })
            .collect();

        Self {
            total,
            passed,
            failed,
            failures,
        }
    }

    /// Returns true if every case passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Truncation is acceptable: durations over ~584 million years are not realistic
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_accessor() {
        let result = ExecutionResult {
            case_id: CaseId::new("ok"),
            latency: Duration::from_millis(42),
            response: ResponseOutcome::Completed {
                response: ResponseSnapshot::new(200, std::collections::HashMap::new(), b"{}"),
            },
        };
        assert!(result.snapshot().is_some());
        assert_eq!(result.latency_ms(), 42);

        let timed_out = ExecutionResult {
            case_id: CaseId::new("slow"),
            latency: Duration::from_millis(5000),
            response: ResponseOutcome::TimedOut { limit_ms: 5000 },
        };
        assert!(timed_out.snapshot().is_none());
    }

    #[test]
    fn test_summary_counts() {
        let outcomes = vec![
            CaseOutcome::pass(CaseId::new("a")),
            CaseOutcome::fail(
                CaseId::new("b"),
                vec!["expected status 200, got 404".to_string()],
            ),
            CaseOutcome::pass(CaseId::new("c")),
        ];

        let summary = RunSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_passed());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].case_id.as_str(), "b");
    }

    #[test]
    fn test_summary_preserves_outcome_order() {
        let outcomes = vec![
            CaseOutcome::fail(CaseId::new("a"), vec!["first".to_string()]),
            CaseOutcome::pass(CaseId::new("b")),
            CaseOutcome::fail(CaseId::new("c"), vec!["second".to_string()]),
        ];

        let summary = RunSummary::from_outcomes(&outcomes);
        let ids: Vec<_> = summary
            .failures
            .iter()
            .map(|f| f.case_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_execution_result_serde() {
        let result = ExecutionResult {
            case_id: CaseId::new("x"),
            latency: Duration::from_millis(1500),
            response: ResponseOutcome::TransportFailed {
                message: "connection refused by localhost".to_string(),
            },
        };

        let json = serde_json::to_string(&result).unwrap();
        let restored: ExecutionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, restored);
    }
}
