use std::path::Path;
use std::time::Duration;

use crate::dispatch::{OutcomeStatus, RequestOutcome};
use crate::error::StampedeError;

/// Read-only summary computed once after all outcomes are collected.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    /// Configured request count, not completed count (they are equal in a
    /// normal run, but rates are defined against the configured N).
    pub total_requests: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub success_rate: f64,
    pub error_rate: f64,
    /// Wall-clock time for the whole run.
    pub total_time: Duration,
    /// Mean head latency over every outcome, success or not. Zero when no
    /// outcomes were recorded.
    pub mean_response_time: Duration,
    /// Rendered error lines, completion order.
    pub errors: Vec<String>,
    /// Rendered success blocks, completion order.
    pub responses: Vec<String>,
}

impl AggregateReport {
    pub fn from_outcomes(
        total_requests: usize,
        total_time: Duration,
        outcomes: &[RequestOutcome],
    ) -> Self {
        let success_count = outcomes.iter().filter(|o| o.is_success()).count();
        let error_count = outcomes.len() - success_count;

        let (success_rate, error_rate) = if total_requests == 0 {
            (0.0, 0.0)
        } else {
            let n = total_requests as f64;
            (
                success_count as f64 / n * 100.0,
                error_count as f64 / n * 100.0,
            )
        };

        let mean_response_time = if outcomes.is_empty() {
            Duration::ZERO
        } else {
            outcomes.iter().map(|o| o.elapsed).sum::<Duration>() / outcomes.len() as u32
        };

        let mut errors = Vec::new();
        let mut responses = Vec::new();
        for outcome in outcomes {
            match outcome.status {
                OutcomeStatus::Success => responses.push(render_success(outcome)),
                OutcomeStatus::HttpError | OutcomeStatus::TransportFailure => {
                    errors.push(render_error(outcome));
                }
            }
        }

        Self {
            total_requests,
            success_count,
            error_count,
            success_rate,
            error_rate,
            total_time,
            mean_response_time,
            errors,
            responses,
        }
    }

    /// Render the full report artifact: summary block, error details block,
    /// then every successful response in completion order.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("=== LOAD TEST REPORT ===\n");
        out.push_str(&format!("Total Requests: {}\n", self.total_requests));
        out.push_str(&format!("Successful Requests: {}\n", self.success_count));
        out.push_str(&format!("Failed Requests: {}\n", self.error_count));
        out.push_str(&format!("Success Rate: {:.2}%\n", self.success_rate));
        out.push_str(&format!("Error Rate: {:.2}%\n", self.error_rate));
        out.push_str(&format!(
            "Total Execution Time: {:.2} sec\n",
            self.total_time.as_secs_f64()
        ));
        out.push_str(&format!(
            "Average Response Time: {:.2} sec\n",
            self.mean_response_time.as_secs_f64()
        ));

        out.push_str("\n=== ERROR DETAILS ===\n");
        if self.errors.is_empty() {
            out.push_str("No errors encountered.\n");
        } else {
            for error in &self.errors {
                out.push_str(error);
                out.push('\n');
            }
        }

        for response in &self.responses {
            out.push('\n');
            out.push_str(response);
        }

        out
    }

    /// Persist the rendered report. Atomic write: temp file + rename
    /// prevents partial reads. This is the only fatal failure of a run.
    pub async fn persist(&self, path: &Path) -> Result<(), StampedeError> {
        let report_write = |source| StampedeError::ReportWrite {
            path: path.to_path_buf(),
            source,
        };

        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, self.render().as_bytes())
            .await
            .map_err(report_write)?;

        if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(report_write(e));
        }

        Ok(())
    }
}

fn render_success(outcome: &RequestOutcome) -> String {
    format!(
        "Request {}: SUCCESS ({:.2} sec)\nResponse:\n{}\n",
        outcome.index,
        outcome.elapsed.as_secs_f64(),
        outcome.text.as_deref().unwrap_or("")
    )
}

fn render_error(outcome: &RequestOutcome) -> String {
    let detail = outcome.detail.as_deref().unwrap_or("");
    match outcome.status {
        OutcomeStatus::HttpError => format!("Request {}: ERROR {detail}", outcome.index),
        _ => format!("Request {}: FAILED - {detail}", outcome.index),
    }
}
