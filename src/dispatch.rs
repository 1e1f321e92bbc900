use std::time::{Duration, Instant};

use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;

use crate::payload::RequestSpec;

/// Terminal status of one request execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    HttpError,
    TransportFailure,
}

/// Result record of one request execution. Exactly one is produced per
/// dispatched request, created here and consumed once by the aggregator.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// 1-based sequence number assigned at dispatch time. Stable across
    /// completion-order races; used for reporting only.
    pub index: usize,
    pub status: OutcomeStatus,
    /// Time from request start to response head (success / HTTP error) or
    /// to failure detection (transport failure). NOT full-stream time.
    pub elapsed: Duration,
    /// Full reassembled response text (Success only).
    pub text: Option<String>,
    /// HTTP status + body (HttpError) or failure description (TransportFailure).
    pub detail: Option<String>,
}

impl RequestOutcome {
    pub fn success(index: usize, elapsed: Duration, text: String) -> Self {
        Self {
            index,
            status: OutcomeStatus::Success,
            elapsed,
            text: Some(text),
            detail: None,
        }
    }

    pub fn http_error(index: usize, elapsed: Duration, status: u16, body: String) -> Self {
        Self {
            index,
            status: OutcomeStatus::HttpError,
            elapsed,
            text: None,
            detail: Some(format!("{status} - {body}")),
        }
    }

    pub fn transport_failure(index: usize, elapsed: Duration, description: String) -> Self {
        Self {
            index,
            status: OutcomeStatus::TransportFailure,
            elapsed,
            text: None,
            detail: Some(description),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// One line of the streamed response body. Lines that don't match this shape
/// still deserialize (every field is optional) or are discarded as noise.
#[derive(Deserialize)]
struct StreamLine {
    message: Option<StreamMessage>,
}

#[derive(Deserialize)]
struct StreamMessage {
    content: Option<String>,
}

/// Executes single requests against the streaming chat endpoint.
///
/// Holds one connection-pooled client shared by every concurrent request for
/// the run's lifetime. Deliberately no request or connect timeout: a hung
/// request hangs the run (reference behavior).
pub struct ChatDispatch {
    client: Client,
    url: String,
}

impl ChatDispatch {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            url: url.into(),
        }
    }

    /// Execute one request to exactly one outcome. Infallible: every failure
    /// mode (connect, send, mid-stream read) is converted to a
    /// TransportFailure outcome so no error can abort sibling requests.
    pub async fn execute(&self, spec: &RequestSpec, index: usize) -> RequestOutcome {
        let start = Instant::now();
        match self.try_execute(spec, index, start).await {
            Ok(outcome) => outcome,
            Err(e) => RequestOutcome::transport_failure(index, start.elapsed(), e.to_string()),
        }
    }

    async fn try_execute(
        &self,
        spec: &RequestSpec,
        index: usize,
        start: Instant,
    ) -> Result<RequestOutcome, reqwest::Error> {
        let response = self.client.post(&self.url).json(spec).send().await?;

        // "Response time" is measured at head receipt, before the stream is
        // consumed. This under-reports latency for long streamed answers but
        // matches the reference semantic (endpoint responsiveness, not total
        // generation time).
        let elapsed = start.elapsed();
        let status = response.status();

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Ok(RequestOutcome::http_error(
                index,
                elapsed,
                status.as_u16(),
                body,
            ));
        }

        let mut text = String::new();
        let mut buf: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buf.extend_from_slice(&chunk);

            while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                append_fragment(&mut text, &line);
            }
        }

        // The stream may end without a trailing newline.
        if !buf.is_empty() {
            append_fragment(&mut text, &buf);
        }

        Ok(RequestOutcome::success(index, elapsed, text))
    }
}

/// Decode one line of the stream and append its `message.content` fragment.
/// Malformed lines are protocol noise (keep-alives, partials) and must not
/// abort the response — they are dropped without affecting the outcome.
fn append_fragment(text: &mut String, line: &[u8]) {
    let line = String::from_utf8_lossy(line);
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    match serde_json::from_str::<StreamLine>(line) {
        Ok(decoded) => {
            if let Some(content) = decoded.message.and_then(|m| m.content) {
                text.push_str(&content);
            }
        }
        Err(_) => {
            tracing::trace!("discarding malformed stream line: {line}");
        }
    }
}
