//! Snapshot of a received HTTP response.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The observable parts of an HTTP response, captured once and then
/// only read by the assertion engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    /// HTTP status code. Non-2xx codes are data here, never errors.
    pub status: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Response body as text.
    pub body: String,
    /// Content-Type header value, extracted for convenience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ResponseSnapshot {
    /// Creates a snapshot from raw response data.
    ///
    /// Invalid UTF-8 in the body is replaced lossily; body predicates
    /// operate on text and JSON only.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: &[u8]) -> Self {
        let content_type = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.clone());

        Self {
            status,
            headers,
            body: String::from_utf8_lossy(body).into_owned(),
            content_type,
        }
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Attempts to parse the body as JSON.
    #[must_use]
    pub fn body_json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Returns true if the body has no observable content.
    ///
    /// An empty or whitespace-only body, JSON `null`, `{}`, and `[]`
    /// all count as empty. Endpoints returning 204 or 404 differ in
    /// which of these they produce, and the distinction must not leak
    /// into assertion results.
    #[must_use]
    pub fn is_empty_body(&self) -> bool {
        let trimmed = self.body.trim();
        if trimmed.is_empty() {
            return true;
        }
        match serde_json::from_str::<serde_json::Value>(trimmed) {
            Ok(serde_json::Value::Null) => true,
            Ok(serde_json::Value::Object(map)) => map.is_empty(),
            Ok(serde_json::Value::Array(items)) => items.is_empty(),
            Ok(serde_json::Value::String(s)) => s.is_empty(),
            _ => false,
        }
    }
}
