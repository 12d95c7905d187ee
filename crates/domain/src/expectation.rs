//! Declarative response expectations.
//!
//! An [`Expectation`] is the set of independent predicates a response
//! must satisfy: an exact status code, latency bounds, a content-type
//! fragment, and structural body-shape predicates.

use serde::{Deserialize, Serialize};

/// The full expectation set for one test case.
///
/// Every configured predicate is evaluated independently; a case passes
/// only when all of them hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expectation {
    /// Expected status code, matched exactly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Latency bounds in milliseconds.
    #[serde(default, skip_serializing_if = "LatencyBound::is_unbounded")]
    pub latency: LatencyBound,
    /// Expected Content-Type fragment (substring match).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Structural predicates over the response body.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<BodyPredicate>,
}

impl Expectation {
    /// Creates an empty expectation that any response satisfies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected status code.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the exclusive upper latency bound in milliseconds.
    #[must_use]
    pub const fn with_max_latency_ms(mut self, max_ms: u64) -> Self {
        self.latency.max_ms = Some(max_ms);
        self
    }

    /// Sets the inclusive lower latency bound in milliseconds.
    #[must_use]
    pub const fn with_min_latency_ms(mut self, min_ms: u64) -> Self {
        self.latency.min_ms = Some(min_ms);
        self
    }

    /// Sets the expected Content-Type fragment.
    #[must_use]
    pub fn with_content_type(mut self, fragment: impl Into<String>) -> Self {
        self.content_type = Some(fragment.into());
        self
    }

    /// Adds a body predicate.
    #[must_use]
    pub fn with_body(mut self, predicate: BodyPredicate) -> Self {
        self.body.push(predicate);
        self
    }

    /// Returns true if no predicate is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.latency.is_unbounded()
            && self.content_type.is_none()
            && self.body.is_empty()
    }
}

/// Latency bounds in milliseconds.
///
/// The lower bound is inclusive (`>=`), the upper bound exclusive (`<`).
/// Either side may be absent for a one-sided bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyBound {
    /// Exclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ms: Option<u64>,
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_ms: Option<u64>,
}

impl LatencyBound {
    /// Returns true if neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.max_ms.is_none() && self.min_ms.is_none()
    }
}

/// A structural predicate over a JSON response body.
///
/// Property paths are dotted (`data.id`); numeric segments index into
/// arrays. All predicates except `HasExactKeys` tolerate extra fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodyPredicate {
    /// The body has a property at the given path.
    HasProperty {
        /// Dotted property path.
        path: String,
    },
    /// The property at the given path equals the given JSON value.
    PropertyEquals {
        /// Dotted property path.
        path: String,
        /// Expected value.
        value: serde_json::Value,
    },
    /// The body has no observable content.
    ///
    /// An absent body, an empty or whitespace-only string, JSON `null`,
    /// `{}`, and `[]` all satisfy this.
    IsEmpty,
    /// The body is a JSON object whose key set equals exactly the given
    /// keys, with no extras and no omissions.
    HasExactKeys {
        /// The required key set.
        keys: Vec<String>,
    },
    /// The value at the given path (or the whole body when absent) is a
    /// non-empty array.
    ArrayNonEmpty {
        /// Dotted property path; `None` targets the body itself.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// The string property at the given path contains the substring
    /// (case-sensitive).
    PropertyContains {
        /// Dotted property path.
        path: String,
        /// Required substring.
        substring: String,
    },
}

impl BodyPredicate {
    /// Get a human-readable description of this predicate.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::HasProperty { path } => format!("body has property '{path}'"),
            Self::PropertyEquals { path, value } => {
                format!("body property '{path}' equals {value}")
            }
            Self::IsEmpty => "body is empty".to_string(),
            Self::HasExactKeys { keys } => {
                format!("body has exactly keys [{}]", keys.join(", "))
            }
            Self::ArrayNonEmpty { path: Some(path) } => {
                format!("body property '{path}' is a non-empty array")
            }
            Self::ArrayNonEmpty { path: None } => "body is a non-empty array".to_string(),
            Self::PropertyContains { path, substring } => {
                format!("body property '{path}' contains '{substring}'")
            }
        }
    }
}
