//! Run orchestrator.
//!
//! Drives registry → executor → assertion engine → report sink, either
//! sequentially or with bounded parallelism. Whatever the completion
//! order, outcomes are resequenced to registry order before the sink
//! records them, so reports are deterministic.

use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;

use attest_domain::{CaseOutcome, RunConfig, RunSummary};

use crate::assert::AssertionEngine;
use crate::executor::RequestExecutor;
use crate::ports::HttpTransport;
use crate::registry::CaseRegistry;
use crate::report::ReportSink;

/// Requests cancellation of a run between case dispatches.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signals the run to stop before dispatching further cases.
    /// In-flight requests still run to their own timeout.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes a cancellation request.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that is never cancelled.
    #[must_use]
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Creates a linked cancel handle/token pair.
#[must_use]
pub fn cancel_channel() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Composes the engine components into a full run.
pub struct Runner<T> {
    executor: Arc<RequestExecutor<T>>,
}

impl<T: HttpTransport + 'static> Runner<T> {
    /// Creates a runner over the given transport and configuration.
    #[must_use]
    pub fn new(transport: Arc<T>, config: RunConfig) -> Self {
        Self {
            executor: Arc::new(RequestExecutor::new(transport, config)),
        }
    }

    /// Returns the run configuration.
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        self.executor.config()
    }

    /// Runs every registered case to completion.
    pub async fn run(&self, registry: &CaseRegistry) -> RunSummary {
        self.run_with_cancel(registry, CancelToken::never()).await
    }

    /// Runs registered cases until done or cancelled.
    ///
    /// Cancellation is cooperative: it is checked before each dispatch,
    /// and already-dispatched requests are never hard-killed.
    pub async fn run_with_cancel(
        &self,
        registry: &CaseRegistry,
        cancel: CancelToken,
    ) -> RunSummary {
        let max_parallel = self.executor.config().max_parallel();
        let mut sink = ReportSink::new();

        if max_parallel <= 1 {
            self.run_sequential(registry, &cancel, &mut sink).await;
        } else {
            self.run_parallel(registry, &cancel, max_parallel, &mut sink)
                .await;
        }

        let summary = sink.summarize();
        tracing::info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "run complete"
        );
        summary
    }

    async fn run_sequential(
        &self,
        registry: &CaseRegistry,
        cancel: &CancelToken,
        sink: &mut ReportSink,
    ) {
        let engine = AssertionEngine::new();
        for case in registry.cases() {
            if cancel.is_cancelled() {
                tracing::debug!("run cancelled, skipping remaining cases");
                break;
            }
            let result = self.executor.execute(case).await;
            let outcome = engine.evaluate(&result, &case.expect);
            tracing::debug!(case = %outcome.case_id, passed = outcome.passed, "case evaluated");
            sink.record(outcome);
        }
    }

    async fn run_parallel(
        &self,
        registry: &CaseRegistry,
        cancel: &CancelToken,
        max_parallel: usize,
        sink: &mut ReportSink,
    ) {
        let semaphore = Arc::new(Semaphore::new(max_parallel));
        let mut tasks: JoinSet<(usize, CaseOutcome)> = JoinSet::new();

        for (index, case) in registry.cases().cloned().enumerate() {
            if cancel.is_cancelled() {
                tracing::debug!("run cancelled, skipping remaining cases");
                break;
            }
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            if cancel.is_cancelled() {
                tracing::debug!("run cancelled, skipping remaining cases");
                break;
            }

            let executor = Arc::clone(&self.executor);
            tasks.spawn(async move {
                let _permit = permit;
                let result = executor.execute(&case).await;
                let outcome = AssertionEngine::new().evaluate(&result, &case.expect);
                (index, outcome)
            });
        }

        let mut indexed = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(pair) => indexed.push(pair),
                Err(err) => tracing::warn!(error = %err, "case task did not complete"),
            }
        }

        // Resequence to registry order before recording.
        indexed.sort_by_key(|(index, _)| *index);
        for (_, outcome) in indexed {
            tracing::debug!(case = %outcome.case_id, passed = outcome.passed, "case evaluated");
            sink.record(outcome);
        }
    }
}
