//! Chat assistant backed by a hosted model, primed with a profile of the
//! local machine.

mod gemini;
mod profile;
mod session;

pub use gemini::GeminiTransport;
pub use profile::SystemProfile;
pub use session::ChatSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Parse(String),
    #[error("model returned no text")]
    EmptyReply,
}

/// One request/response round trip carrying the whole conversation.
pub trait ChatTransport {
    fn complete(&mut self, history: &[ChatMessage]) -> Result<String, ChatError>;
}
