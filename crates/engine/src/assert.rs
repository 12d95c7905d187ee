//! Assertion engine.
//!
//! Evaluates an [`Expectation`] against an [`ExecutionResult`]. Every
//! predicate is checked independently; nothing short-circuits, so one
//! run reveals every mismatch at once.

use attest_domain::{
    BodyPredicate, CaseOutcome, ExecutionResult, Expectation, ResponseOutcome, ResponseSnapshot,
};

/// Stateless evaluator of expectations.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssertionEngine;

impl AssertionEngine {
    /// Creates a new assertion engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates the expectation and collects every violated predicate.
    #[must_use]
    pub fn evaluate(&self, result: &ExecutionResult, expectation: &Expectation) -> CaseOutcome {
        let case_id = result.case_id.clone();

        let response = match &result.response {
            ResponseOutcome::TimedOut { limit_ms } => {
                return CaseOutcome::fail(
                    case_id,
                    vec![format!(
                        "timed out after {limit_ms} ms ({} ms elapsed)",
                        result.latency_ms()
                    )],
                );
            }
            ResponseOutcome::TransportFailed { message } => {
                return CaseOutcome::fail(case_id, vec![format!("transport failure: {message}")]);
            }
            ResponseOutcome::Completed { response } => response,
        };

        let mut failures = Vec::new();

        if let Some(expected) = expectation.status {
            if response.status != expected {
                failures.push(format!(
                    "expected status {expected}, got {}",
                    response.status
                ));
            }
        }

        let actual_ms = result.latency_ms();
        if let Some(max_ms) = expectation.latency.max_ms {
            if actual_ms >= max_ms {
                failures.push(format!(
                    "response took {actual_ms} ms, expected < {max_ms} ms"
                ));
            }
        }
        if let Some(min_ms) = expectation.latency.min_ms {
            if actual_ms < min_ms {
                failures.push(format!(
                    "response took {actual_ms} ms, expected >= {min_ms} ms"
                ));
            }
        }

        if let Some(fragment) = &expectation.content_type {
            match &response.content_type {
                Some(actual) if actual.contains(fragment) => {}
                Some(actual) => failures.push(format!(
                    "content-type '{actual}' does not contain '{fragment}'"
                )),
                None => failures.push(format!(
                    "no Content-Type header present, expected one containing '{fragment}'"
                )),
            }
        }

        for predicate in &expectation.body {
            if let Err(message) = check_body(predicate, response) {
                failures.push(message);
            }
        }

        if failures.is_empty() {
            CaseOutcome::pass(case_id)
        } else {
            CaseOutcome::fail(case_id, failures)
        }
    }
}

/// Checks one body predicate, returning the failure message if it does
/// not hold.
fn check_body(predicate: &BodyPredicate, response: &ResponseSnapshot) -> Result<(), String> {
    match predicate {
        BodyPredicate::IsEmpty => {
            if response.is_empty_body() {
                Ok(())
            } else {
                Err(format!(
                    "expected empty body, got {}",
                    preview(&response.body)
                ))
            }
        }
        BodyPredicate::HasProperty { path } => {
            let json = parse_json(response, predicate)?;
            if lookup(&json, path).is_some() {
                Ok(())
            } else {
                Err(format!("body property '{path}' not found"))
            }
        }
        BodyPredicate::PropertyEquals { path, value } => {
            let json = parse_json(response, predicate)?;
            match lookup(&json, path) {
                Some(actual) if actual == value => Ok(()),
                Some(actual) => Err(format!(
                    "body property '{path}' mismatch: expected {value}, got {actual}"
                )),
                None => Err(format!("body property '{path}' not found")),
            }
        }
        BodyPredicate::HasExactKeys { keys } => {
            let json = parse_json(response, predicate)?;
            check_exact_keys(&json, keys)
        }
        BodyPredicate::ArrayNonEmpty { path } => {
            let json = parse_json(response, predicate)?;
            let (target, label) = match path {
                Some(path) => match lookup(&json, path) {
                    Some(value) => (value.clone(), format!("body property '{path}'")),
                    None => return Err(format!("body property '{path}' not found")),
                },
                None => (json, "body".to_string()),
            };
            match target.as_array() {
                Some(items) if !items.is_empty() => Ok(()),
                Some(_) => Err(format!("{label} is an empty array")),
                None => Err(format!("{label} is not an array")),
            }
        }
        BodyPredicate::PropertyContains { path, substring } => {
            let json = parse_json(response, predicate)?;
            match lookup(&json, path) {
                Some(serde_json::Value::String(actual)) => {
                    if actual.contains(substring.as_str()) {
                        Ok(())
                    } else {
                        Err(format!(
                            "body property '{path}' does not contain '{substring}' (got '{actual}')"
                        ))
                    }
                }
                Some(other) => Err(format!(
                    "body property '{path}' is not a string (got {other})"
                )),
                None => Err(format!("body property '{path}' not found")),
            }
        }
    }
}

/// Parses the body as JSON for a predicate that requires it.
fn parse_json(
    response: &ResponseSnapshot,
    predicate: &BodyPredicate,
) -> Result<serde_json::Value, String> {
    response
        .body_json()
        .ok_or_else(|| format!("{}: body is not valid JSON", predicate.description()))
}

fn check_exact_keys(json: &serde_json::Value, keys: &[String]) -> Result<(), String> {
    let Some(object) = json.as_object() else {
        return Err(format!("body is not an object, cannot match keys {keys:?}"));
    };

    let mut missing: Vec<&str> = keys
        .iter()
        .map(String::as_str)
        .filter(|k| !object.contains_key(*k))
        .collect();
    let mut unexpected: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|k| !keys.iter().any(|expected| expected == k))
        .collect();
    missing.sort_unstable();
    unexpected.sort_unstable();

    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }

    let mut parts = vec![format!("body keys do not match [{}]", keys.join(", "))];
    if !missing.is_empty() {
        parts.push(format!("missing [{}]", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        parts.push(format!("unexpected [{}]", unexpected.join(", ")));
    }
    Err(parts.join("; "))
}

/// Truncates a body for inclusion in a failure message.
fn preview(body: &str) -> String {
    const LIMIT: usize = 100;
    match body.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("'{}...'", &body[..cut]),
        None => format!("'{body}'"),
    }
}

/// Looks up a dotted path in a JSON value. Numeric segments index into
/// arrays.
fn lookup<'a>(json: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = json;
    for segment in path.split('.') {
        current = match current {
            serde_json::Value::Object(map) => map.get(segment)?,
            serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use attest_domain::CaseId;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::Duration;

    fn completed(status: u16, body: &str, latency_ms: u64) -> ExecutionResult {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        ExecutionResult {
            case_id: CaseId::new("case"),
            latency: Duration::from_millis(latency_ms),
            response: ResponseOutcome::Completed {
                response: ResponseSnapshot::new(status, headers, body.as_bytes()),
            },
        }
    }

    fn engine() -> AssertionEngine {
        AssertionEngine::new()
    }

    #[test]
    fn test_status_mismatch_reports_both_values() {
        let result = completed(404, "{}", 50);
        let outcome = engine().evaluate(&result, &Expectation::new().with_status(200));

        assert!(!outcome.passed);
        assert_eq!(outcome.failures, vec!["expected status 200, got 404"]);
    }

    #[test]
    fn test_predicates_do_not_short_circuit() {
        let result = completed(500, "not json", 9000);
        let expectation = Expectation::new()
            .with_status(200)
            .with_max_latency_ms(5000)
            .with_body(BodyPredicate::HasProperty {
                path: "data".to_string(),
            });

        let outcome = engine().evaluate(&result, &expectation);
        assert_eq!(outcome.failures.len(), 3);
    }

    #[test]
    fn test_two_sided_latency_bound() {
        let expectation = Expectation::new()
            .with_min_latency_ms(2000)
            .with_max_latency_ms(10_000);

        // Inside the band.
        let outcome = engine().evaluate(&completed(200, "{}", 2500), &expectation);
        assert!(outcome.passed);

        // Too fast: only the lower bound is reported.
        let outcome = engine().evaluate(&completed(200, "{}", 1500), &expectation);
        assert_eq!(
            outcome.failures,
            vec!["response took 1500 ms, expected >= 2000 ms"]
        );

        // Too slow: only the upper bound is reported.
        let outcome = engine().evaluate(&completed(200, "{}", 12_000), &expectation);
        assert_eq!(
            outcome.failures,
            vec!["response took 12000 ms, expected < 10000 ms"]
        );

        // The lower bound is inclusive, the upper exclusive.
        assert!(engine().evaluate(&completed(200, "{}", 2000), &expectation).passed);
        assert!(!engine().evaluate(&completed(200, "{}", 10_000), &expectation).passed);
    }

    #[test]
    fn test_empty_body_passes_on_contentless_responses() {
        let expectation = Expectation::new()
            .with_status(404)
            .with_body(BodyPredicate::IsEmpty);

        for body in ["", "{}", "[]", "null", "  "] {
            let outcome = engine().evaluate(&completed(404, body, 50), &expectation);
            assert!(outcome.passed, "body {body:?} should count as empty");
        }
    }

    #[test]
    fn test_empty_body_fails_on_any_content() {
        let expectation = Expectation::new()
            .with_status(404)
            .with_body(BodyPredicate::IsEmpty);

        let outcome = engine().evaluate(&completed(404, r#"{"error": "x"}"#, 50), &expectation);
        assert!(!outcome.passed);
        assert!(outcome.failures[0].starts_with("expected empty body"));
    }

    #[test]
    fn test_list_users_scenario() {
        // GET /users?page=2: 200, non-empty `data` array, page == 2.
        let body = r#"{"page": 2, "per_page": 6, "data": [{"id": 7}]}"#;
        let expectation = Expectation::new()
            .with_status(200)
            .with_body(BodyPredicate::ArrayNonEmpty {
                path: Some("data".to_string()),
            })
            .with_body(BodyPredicate::PropertyEquals {
                path: "page".to_string(),
                value: serde_json::json!(2),
            });

        let outcome = engine().evaluate(&completed(200, body, 120), &expectation);
        assert!(outcome.passed, "failures: {:?}", outcome.failures);

        // Extra fields are tolerated: only `has exactly keys` is strict.
        let drifted = r#"{"page": 2, "data": [{"id": 7}], "support": {}}"#;
        let outcome = engine().evaluate(&completed(200, drifted, 120), &expectation);
        assert!(outcome.passed);
    }

    #[test]
    fn test_register_failure_scenario() {
        // POST /register without password: 400 + `error` property.
        let expectation = Expectation::new()
            .with_status(400)
            .with_body(BodyPredicate::HasProperty {
                path: "error".to_string(),
            });

        let body = r#"{"error": "Missing password"}"#;
        let outcome = engine().evaluate(&completed(400, body, 80), &expectation);
        assert!(outcome.passed);

        let outcome = engine().evaluate(&completed(400, "{}", 80), &expectation);
        assert_eq!(outcome.failures, vec!["body property 'error' not found"]);
    }

    #[test]
    fn test_exact_keys_strict_both_ways() {
        let keys = vec![
            "name".to_string(),
            "job".to_string(),
            "id".to_string(),
            "createdAt".to_string(),
        ];
        let expectation = Expectation::new().with_body(BodyPredicate::HasExactKeys { keys });

        let exact = r#"{"name": "morpheus", "job": "leader", "id": "42", "createdAt": "now"}"#;
        assert!(engine().evaluate(&completed(201, exact, 50), &expectation).passed);

        let short = r#"{"name": "morpheus", "job": "leader"}"#;
        let outcome = engine().evaluate(&completed(201, short, 50), &expectation);
        assert!(outcome.failures[0].contains("missing [createdAt, id]"));

        let extra = r#"{"name": "m", "job": "l", "id": "1", "createdAt": "t", "updatedAt": "t"}"#;
        let outcome = engine().evaluate(&completed(201, extra, 50), &expectation);
        assert!(outcome.failures[0].contains("unexpected [updatedAt]"));
    }

    #[test]
    fn test_property_contains_is_case_sensitive() {
        let expectation = Expectation::new().with_body(BodyPredicate::PropertyContains {
            path: "error".to_string(),
            substring: "Missing password".to_string(),
        });

        let body = r#"{"error": "Missing password"}"#;
        assert!(engine().evaluate(&completed(400, body, 50), &expectation).passed);

        let body = r#"{"error": "missing password"}"#;
        let outcome = engine().evaluate(&completed(400, body, 50), &expectation);
        assert!(!outcome.passed);
    }

    #[test]
    fn test_nested_path_lookup() {
        let body = r#"{"data": {"id": 2, "tags": ["alpha", "beta"]}}"#;
        let expectation = Expectation::new()
            .with_body(BodyPredicate::PropertyEquals {
                path: "data.id".to_string(),
                value: serde_json::json!(2),
            })
            .with_body(BodyPredicate::PropertyEquals {
                path: "data.tags.1".to_string(),
                value: serde_json::json!("beta"),
            });

        let outcome = engine().evaluate(&completed(200, body, 50), &expectation);
        assert!(outcome.passed, "failures: {:?}", outcome.failures);
    }

    #[test]
    fn test_content_type_fragment() {
        let expectation = Expectation::new().with_content_type("application/json");
        let outcome = engine().evaluate(&completed(200, "{}", 50), &expectation);
        assert!(outcome.passed);

        let bare = ExecutionResult {
            case_id: CaseId::new("case"),
            latency: Duration::from_millis(50),
            response: ResponseOutcome::Completed {
                response: ResponseSnapshot::new(200, HashMap::new(), b"{}"),
            },
        };
        let outcome = engine().evaluate(&bare, &expectation);
        assert!(outcome.failures[0].contains("no Content-Type header"));
    }

    #[test]
    fn test_timeout_reported_as_its_own_category() {
        let result = ExecutionResult {
            case_id: CaseId::new("slow"),
            latency: Duration::from_millis(5003),
            response: ResponseOutcome::TimedOut { limit_ms: 5000 },
        };
        let outcome = engine().evaluate(&result, &Expectation::new().with_status(200));

        assert!(!outcome.passed);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].starts_with("timed out after 5000 ms"));
    }

    #[test]
    fn test_transport_failure_reported_distinctly() {
        let result = ExecutionResult {
            case_id: CaseId::new("down"),
            latency: Duration::from_millis(12),
            response: ResponseOutcome::TransportFailed {
                message: "connection refused by reqres.in".to_string(),
            },
        };
        let outcome = engine().evaluate(&result, &Expectation::new().with_status(200));

        assert_eq!(
            outcome.failures,
            vec!["transport failure: connection refused by reqres.in"]
        );
    }

    #[test]
    fn test_empty_expectation_always_passes() {
        let outcome = engine().evaluate(&completed(503, "oops", 50), &Expectation::new());
        assert!(outcome.passed);
    }
}
