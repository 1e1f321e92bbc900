use std::env;
use std::path::PathBuf;

/// Defaults match the reference workload: 200 requests against a local
/// Ollama chat endpoint with a fixed summarization prompt.
pub const DEFAULT_URL: &str = "http://localhost:11434/api/chat";
pub const DEFAULT_MODEL: &str = "llama3.2:1b";
pub const DEFAULT_PROMPT: &str = "Summarize all the following tasks in a dashed list: \
     I need to go to the gym and eat breakfast";
pub const DEFAULT_REQUEST_COUNT: usize = 200;
pub const DEFAULT_REPORT_PATH: &str = "load_test_report.txt";

#[derive(Debug, Clone)]
pub struct Config {
    /// Target chat endpoint. One fixed endpoint per run.
    pub url: String,
    /// Model identifier sent in every payload.
    pub model: String,
    /// User message content for the request template.
    pub prompt: String,
    /// Number of requests dispatched concurrently.
    pub request_count: usize,
    /// Where the final report artifact is written.
    pub report_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            request_count: DEFAULT_REQUEST_COUNT,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(url) = env::var("STAMPEDE_URL") {
            config.url = url;
        }
        if let Ok(model) = env::var("STAMPEDE_MODEL") {
            config.model = model;
        }
        if let Ok(prompt) = env::var("STAMPEDE_PROMPT") {
            config.prompt = prompt;
        }
        if let Ok(path) = env::var("STAMPEDE_REPORT_PATH") {
            config.report_path = PathBuf::from(path);
        }
        if let Ok(raw) = env::var("STAMPEDE_REQUEST_COUNT") {
            match raw.parse::<usize>() {
                Ok(count) => config.request_count = count,
                Err(_) => {
                    tracing::warn!(
                        "STAMPEDE_REQUEST_COUNT is not a valid count: {raw:?} — using default {DEFAULT_REQUEST_COUNT}"
                    );
                }
            }
        }

        config
    }
}
