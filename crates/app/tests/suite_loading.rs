//! Integration tests for the shipped suite file.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use attest_domain::{BodyPredicate, HttpMethod, SuiteFile};
use attest_engine::CaseRegistry;
use pretty_assertions::assert_eq;

fn load_reqres_suite() -> SuiteFile {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../suites/reqres.json");
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn reqres_suite_parses_and_registers() {
    let suite = load_reqres_suite();
    assert_eq!(suite.name, "reqres user API");
    assert_eq!(suite.cases.len(), 12);

    let registry = CaseRegistry::from_cases(suite.cases).unwrap();
    assert_eq!(registry.len(), 12);
}

#[test]
fn reqres_suite_config_builds() {
    let suite = load_reqres_suite();
    let config = suite.config.unwrap().to_run_config().unwrap();

    assert_eq!(config.base_url().as_str(), "https://reqres.in/api");
    assert_eq!(config.default_timeout_ms(), 5000);
    assert_eq!(config.headers().get("x-api-key"), Some("reqres-free-v1"));
    assert_eq!(config.max_parallel(), 1);
}

#[test]
fn delayed_case_has_two_sided_bound_and_timeout_override() {
    let suite = load_reqres_suite();
    let case = suite
        .cases
        .iter()
        .find(|c| c.id.as_str() == "delayed-list")
        .unwrap();

    assert_eq!(case.method, HttpMethod::Get);
    assert_eq!(case.timeout_ms, Some(10_000));
    assert_eq!(case.expect.latency.min_ms, Some(2000));
    assert_eq!(case.expect.latency.max_ms, Some(10_000));
}

#[test]
fn contentless_cases_assert_empty_bodies() {
    let suite = load_reqres_suite();

    for id in ["missing-user", "delete-user"] {
        let case = suite.cases.iter().find(|c| c.id.as_str() == id).unwrap();
        assert!(
            case.expect.body.contains(&BodyPredicate::IsEmpty),
            "{id} should assert an empty body"
        );
    }
}

#[test]
fn create_user_asserts_exact_key_set() {
    let suite = load_reqres_suite();
    let case = suite
        .cases
        .iter()
        .find(|c| c.id.as_str() == "create-user")
        .unwrap();

    assert_eq!(case.expect.status, Some(201));
    let exact_keys = case.expect.body.iter().find_map(|p| match p {
        BodyPredicate::HasExactKeys { keys } => Some(keys.clone()),
        _ => None,
    });
    assert_eq!(
        exact_keys,
        Some(vec![
            "name".to_string(),
            "job".to_string(),
            "id".to_string(),
            "createdAt".to_string(),
        ])
    );
}
