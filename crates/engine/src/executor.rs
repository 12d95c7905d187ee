//! Request executor.
//!
//! Turns one [`TestCase`] into one [`ExecutionResult`]: URL assembly,
//! header merging, body serialization, timeout enforcement, and latency
//! measurement. Non-2xx statuses are captured as data; only transport
//! events produce the non-completed result variants.

use std::sync::Arc;
use std::time::{Duration, Instant};

use url::Url;

use attest_domain::{
    ExecutionResult, ResponseOutcome, ResponseSnapshot, RunConfig, TestCase,
};

use crate::ports::{HttpTransport, TransportError, TransportRequest};

/// Executes test cases against a configured base URL through a
/// transport port.
#[derive(Debug)]
pub struct RequestExecutor<T> {
    transport: Arc<T>,
    config: RunConfig,
}

impl<T> Clone for RequestExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: self.config.clone(),
        }
    }
}

impl<T: HttpTransport> RequestExecutor<T> {
    /// Creates an executor over the given transport and configuration.
    pub const fn new(transport: Arc<T>, config: RunConfig) -> Self {
        Self { transport, config }
    }

    /// Returns the run configuration.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Executes one case and captures the result.
    ///
    /// Never returns an error: timeouts and transport failures are
    /// encoded in the [`ResponseOutcome`] so the caller pattern-matches
    /// instead of catching.
    pub async fn execute(&self, case: &TestCase) -> ExecutionResult {
        let timeout = self.config.timeout_for(case);
        #[allow(clippy::cast_possible_truncation)]
        let limit_ms = timeout.as_millis() as u64;

        let request = match self.build_request(case) {
            Ok(request) => request,
            Err(message) => {
                return ExecutionResult {
                    case_id: case.id.clone(),
                    latency: Duration::ZERO,
                    response: ResponseOutcome::TransportFailed { message },
                };
            }
        };

        tracing::debug!(case = %case.id, method = %case.method, url = %request.url, "dispatching request");

        let started = Instant::now();
        let response = match tokio::time::timeout(timeout, self.transport.send(request)).await {
            Err(_) | Ok(Err(TransportError::Timeout)) => ResponseOutcome::TimedOut { limit_ms },
            Ok(Err(err)) => ResponseOutcome::TransportFailed {
                message: err.to_string(),
            },
            Ok(Ok(raw)) => ResponseOutcome::Completed {
                response: ResponseSnapshot::new(raw.status, raw.headers, &raw.body),
            },
        };

        ExecutionResult {
            case_id: case.id.clone(),
            latency: started.elapsed(),
            response,
        }
    }

    /// Assembles the wire request: base URL + path, query parameters in
    /// declaration order, default headers under case headers, and a
    /// JSON content type when a body is present and none is declared.
    fn build_request(&self, case: &TestCase) -> Result<TransportRequest, String> {
        let base = self.config.base_url().as_str().trim_end_matches('/');
        let path = if case.path.starts_with('/') {
            case.path.clone()
        } else {
            format!("/{}", case.path)
        };

        let mut url = Url::parse(&format!("{base}{path}"))
            .map_err(|e| format!("invalid request URL '{base}{path}': {e}"))?;
        if !case.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in case.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }

        let mut headers = self.config.headers().merged_with(&case.headers);
        if case.body.is_some() && !headers.contains("content-type") {
            headers.insert("Content-Type", "application/json");
        }

        Ok(TransportRequest {
            method: case.method,
            url,
            headers,
            body: case.body.clone(),
        })
    }
}
