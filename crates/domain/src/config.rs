//! Run configuration.
//!
//! A run is parameterized by one explicit, immutable [`RunConfig`]
//! passed into the executor at start. There is no ambient or global
//! configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::case::TestCase;
use crate::request::Headers;

/// Default per-case timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Errors raised while building a [`RunConfig`].
///
/// Configuration errors are fatal: they abort the run before any case
/// executes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No base URL was provided.
    #[error("base URL is required")]
    MissingBaseUrl,

    /// The base URL could not be parsed or has an unsupported scheme.
    #[error("invalid base URL '{url}': {message}")]
    InvalidBaseUrl {
        /// The rejected URL text.
        url: String,
        /// Parser or validation detail.
        message: String,
    },

    /// Parallelism degree must be at least one.
    #[error("max_parallel must be at least 1")]
    ZeroParallelism,
}

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    base_url: Url,
    default_timeout_ms: u64,
    headers: Headers,
    max_parallel: usize,
}

impl RunConfig {
    /// Returns a builder for constructing a `RunConfig`.
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Returns the base URL cases are executed against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the default per-case timeout in milliseconds.
    #[must_use]
    pub const fn default_timeout_ms(&self) -> u64 {
        self.default_timeout_ms
    }

    /// Returns the default headers attached to every request.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the maximum number of cases in flight at once.
    #[must_use]
    pub const fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Returns the effective timeout for a case: its override if set,
    /// the run default otherwise.
    #[must_use]
    pub fn timeout_for(&self, case: &TestCase) -> Duration {
        Duration::from_millis(case.timeout_ms.unwrap_or(self.default_timeout_ms))
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    base_url: Option<String>,
    default_timeout_ms: Option<u64>,
    headers: Headers,
    max_parallel: Option<usize>,
}

impl RunConfigBuilder {
    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the default per-case timeout in milliseconds.
    #[must_use]
    pub const fn default_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = Some(timeout_ms);
        self
    }

    /// Adds a default header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the parallelism degree.
    #[must_use]
    pub const fn max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = Some(max_parallel);
        self
    }

    /// Sets the base URL only if none has been set yet.
    #[must_use]
    pub fn base_url_if_unset(mut self, url: impl Into<String>) -> Self {
        if self.base_url.is_none() {
            self.base_url = Some(url.into());
        }
        self
    }

    /// Sets the default timeout only if none has been set yet.
    #[must_use]
    pub const fn default_timeout_ms_if_unset(mut self, timeout_ms: u64) -> Self {
        if self.default_timeout_ms.is_none() {
            self.default_timeout_ms = Some(timeout_ms);
        }
        self
    }

    /// Adds a default header only if no header with that name exists.
    #[must_use]
    pub fn header_if_unset(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if !self.headers.contains(&name) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the parallelism degree only if none has been set yet.
    #[must_use]
    pub const fn max_parallel_if_unset(mut self, max_parallel: usize) -> Self {
        if self.max_parallel.is_none() {
            self.max_parallel = Some(max_parallel);
        }
        self
    }

    /// Builds the configuration, validating the base URL.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the base URL is missing, unparsable,
    /// or not http(s), or if `max_parallel` is zero.
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let raw = self.base_url.ok_or(ConfigError::MissingBaseUrl)?;
        let base_url = Url::parse(&raw).map_err(|e| ConfigError::InvalidBaseUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: raw,
                message: "scheme must be http or https".to_string(),
            });
        }

        let max_parallel = self.max_parallel.unwrap_or(1);
        if max_parallel == 0 {
            return Err(ConfigError::ZeroParallelism);
        }

        Ok(RunConfig {
            base_url,
            default_timeout_ms: self.default_timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            headers: self.headers,
            max_parallel,
        })
    }
}
