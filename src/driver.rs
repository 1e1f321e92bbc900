use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::{Id as TaskId, JoinSet};

use crate::config::Config;
use crate::dispatch::{ChatDispatch, OutcomeStatus, RequestOutcome};
use crate::payload::RequestSpec;
use crate::report::AggregateReport;

/// Orchestrates the full load run: fan-out of N concurrent request
/// executions, fan-in of their outcomes, and reduction into the report.
///
/// All N requests are issued simultaneously with no concurrency cap — the
/// unbounded fan-out is the intended stress behavior, bounded only by host
/// and server socket limits. Outcomes are task-owned and reduced once after
/// the barrier, so no shared counters and no locks.
pub struct LoadDriver {
    config: Config,
    dispatch: Arc<ChatDispatch>,
}

impl LoadDriver {
    pub fn new(config: Config) -> Self {
        let dispatch = Arc::new(ChatDispatch::new(&config.url));
        Self { config, dispatch }
    }

    /// Run the whole load test. Returns only after every dispatched request
    /// has produced exactly one outcome; per-request failures are contained
    /// in their outcome records and never abort the run.
    pub async fn run(&self) -> AggregateReport {
        let started = Instant::now();
        let template = RequestSpec::from_config(&self.config);
        let count = self.config.request_count;

        tracing::info!(
            url = %self.config.url,
            model = %self.config.model,
            requests = count,
            "dispatching load"
        );

        let mut set = JoinSet::new();

        // Track task ID → request index so a panicked task can still be
        // attributed to its request and yield an outcome.
        let mut task_index_map: HashMap<TaskId, usize> = HashMap::new();

        for index in 1..=count {
            let dispatch = self.dispatch.clone();
            let spec = template.clone();
            let handle = set.spawn(async move { dispatch.execute(&spec, index).await });
            task_index_map.insert(handle.id(), index);
        }

        // Fan-in: collect outcomes in completion order (completions race).
        let mut outcomes = Vec::with_capacity(count);
        while let Some(joined) = set.join_next_with_id().await {
            let outcome = match joined {
                Ok((_, outcome)) => outcome,
                Err(join_err) => {
                    // A panic in a consumer task must not lose its outcome.
                    tracing::error!("request task panicked: {join_err}");
                    let index = task_index_map.get(&join_err.id()).copied().unwrap_or(0);
                    RequestOutcome::transport_failure(
                        index,
                        started.elapsed(),
                        format!("task panicked: {join_err}"),
                    )
                }
            };

            log_outcome(&outcome);
            outcomes.push(outcome);
        }

        AggregateReport::from_outcomes(count, started.elapsed(), &outcomes)
    }
}

fn log_outcome(outcome: &RequestOutcome) {
    match outcome.status {
        OutcomeStatus::Success => {
            tracing::info!(
                index = outcome.index,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "request succeeded"
            );
        }
        OutcomeStatus::HttpError | OutcomeStatus::TransportFailure => {
            tracing::warn!(
                index = outcome.index,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                detail = outcome.detail.as_deref().unwrap_or(""),
                "request failed"
            );
        }
    }
}
