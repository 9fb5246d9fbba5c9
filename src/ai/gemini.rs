use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ChatError, ChatMessage, ChatTransport, Role};
use crate::config::AiConfig;

/// Gemini `generateContent` over blocking HTTP.
pub struct GeminiTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(config: &AiConfig) -> Result<Self, ChatError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ChatError::MissingApiKey)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl ChatTransport for GeminiTransport {
    fn complete(&mut self, history: &[ChatMessage]) -> Result<String, ChatError> {
        let body = GenerateRequest::from_history(history);
        log::debug!("POST {} ({} messages)", self.endpoint(), history.len());

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        parse_reply(&text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn from_history(history: &'a [ChatMessage]) -> Self {
        let contents = history
            .iter()
            .map(|msg| Content {
                role: match msg.role {
                    Role::User => "user",
                    Role::Model => "model",
                },
                parts: vec![Part { text: &msg.text }],
            })
            .collect();
        Self { contents }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn parse_reply(body: &str) -> Result<String, ChatError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ChatError::Parse(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ChatError::EmptyReply);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_maps_roles_to_gemini_names() {
        let history = vec![ChatMessage::user("hi"), ChatMessage::model("hello")];
        let body = serde_json::to_value(GenerateRequest::from_history(&history)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [
                    { "role": "user", "parts": [{ "text": "hi" }] },
                    { "role": "model", "parts": [{ "text": "hello" }] }
                ]
            })
        );
    }

    #[test]
    fn reply_joins_text_parts_of_first_candidate() {
        let body = json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Your CPU " }, { "text": "is idle." }] } },
                { "content": { "role": "model", "parts": [{ "text": "ignored" }] } }
            ]
        })
        .to_string();
        assert_eq!(parse_reply(&body).unwrap(), "Your CPU is idle.");
    }

    #[test]
    fn blocked_prompt_is_an_empty_reply() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
        assert!(matches!(parse_reply(&body), Err(ChatError::EmptyReply)));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(parse_reply("<html>"), Err(ChatError::Parse(_))));
    }

    #[test]
    fn missing_api_key_is_rejected_up_front() {
        let config = AiConfig {
            api_key: Some("  ".into()),
            ..AiConfig::default()
        };
        assert!(matches!(GeminiTransport::new(&config), Err(ChatError::MissingApiKey)));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let config = AiConfig {
            api_key: Some("k".into()),
            base_url: "http://localhost:8080/v1beta/".into(),
            model: "gemini-test".into(),
            ..AiConfig::default()
        };
        let transport = GeminiTransport::new(&config).unwrap();
        assert_eq!(
            transport.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-test:generateContent"
        );
    }
}
