//! Suite file schema.
//!
//! A suite is a JSON document pairing an ordered case list with optional
//! run configuration. CLI flags override the embedded configuration.

use serde::{Deserialize, Serialize};

use crate::case::TestCase;
use crate::config::{ConfigError, RunConfig, RunConfigBuilder};
use crate::request::Headers;

/// A deserialized suite file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteFile {
    /// Human-readable suite name.
    pub name: String,
    /// Optional embedded run configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SuiteConfig>,
    /// Cases in registration order.
    pub cases: Vec<TestCase>,
}

/// Run configuration embedded in a suite file. Every field is optional;
/// absent fields fall back to CLI flags or built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Base URL for every case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Default per-case timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_timeout_ms: Option<u64>,
    /// Headers attached to every request.
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    /// Parallelism degree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,
}

impl SuiteConfig {
    /// Folds this embedded configuration into a builder. Values already
    /// present on the builder are not overwritten, so callers apply
    /// higher-precedence sources first.
    #[must_use]
    pub fn apply_to(&self, mut builder: RunConfigBuilder) -> RunConfigBuilder {
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url_if_unset(base_url);
        }
        if let Some(timeout_ms) = self.default_timeout_ms {
            builder = builder.default_timeout_ms_if_unset(timeout_ms);
        }
        if let Some(max_parallel) = self.max_parallel {
            builder = builder.max_parallel_if_unset(max_parallel);
        }
        for (name, value) in self.headers.iter() {
            builder = builder.header_if_unset(name, value);
        }
        builder
    }

    /// Builds a [`RunConfig`] from this embedded configuration alone.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the base URL is missing or invalid.
    pub fn to_run_config(&self) -> Result<RunConfig, ConfigError> {
        self.apply_to(RunConfig::builder()).build()
    }
}
