use serde::Serialize;

use crate::config::Config;

/// Chat message role as the endpoint expects it on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Immutable description of one request to send. Built once per run from the
/// configured template and cloned for every dispatched request.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSpec {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl RequestSpec {
    pub fn user_prompt(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: content.into(),
            }],
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::user_prompt(&config.model, &config.prompt)
    }
}
