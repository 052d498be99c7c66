//! OpenAI chat-completion client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;

use crate::infrastructure::ports::{CompletionPort, CompletionReply, ExtractionSource, LlmError};

/// Default chat-completion endpoint.
pub const DEFAULT_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

const USER_AGENT: &str = concat!("PawnTalk/", env!("CARGO_PKG_VERSION"));

/// Client for an OpenAI-compatible chat-completion endpoint
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(endpoint: &str) -> Self {
        // Timeouts are set per request from the caller's settings.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CompletionPort for OpenAiClient {
    async fn post_completion(
        &self,
        token: &str,
        body: String,
        timeout: Duration,
    ) -> Result<CompletionReply, LlmError> {
        if token.trim().is_empty() {
            return Err(LlmError::MissingToken);
        }

        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(token.trim())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, endpoint = %self.endpoint, "Chat completion request failed");
                return Ok(CompletionReply::Failed {
                    status: None,
                    body: e.to_string(),
                });
            }
        };

        let status = response.status();
        let raw = match response.text().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, status = %status, "Failed to read chat completion body");
                return Ok(CompletionReply::Failed {
                    status: Some(status.as_u16()),
                    body: e.to_string(),
                });
            }
        };

        if !status.is_success() {
            tracing::error!(status = %status, body = %raw, "Chat completion HTTP error");
            let body = if raw.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                raw
            };
            return Ok(CompletionReply::Failed {
                status: Some(status.as_u16()),
                body,
            });
        }

        Ok(extract_reply(&raw))
    }
}

/// One single-message chat request, serialized per call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub user_message: String,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            user_message: user_message.into(),
            temperature: pawntalk_domain::DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Wire body for this request.
    pub fn to_body(&self) -> String {
        build_request_body(&self.user_message, &self.model, self.temperature)
    }
}

/// Serialize a single-message chat request.
///
/// Only backslash, double quote, newline and carriage return are escaped in
/// the message; model is written verbatim.
pub fn build_request_body(message: &str, model: &str, temperature: f32) -> String {
    format!(
        "{{\"model\":\"{}\",\"messages\":[{{\"role\":\"user\",\"content\":\"{}\"}}],\"temperature\":{},\"stream\":false}}",
        model,
        escape_message(message),
        temperature
    )
}

fn escape_message(message: &str) -> String {
    let mut out = String::with_capacity(message.len() + 8);
    for c in message.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Pull the reply text out of a successful response body.
///
/// Tries `choices[0].message.content` first. Falls back to
/// [`scan_content_field`] unless the body is an API error object.
pub fn extract_reply(raw: &str) -> CompletionReply {
    match serde_json::from_str::<ChatResponse>(raw) {
        Ok(parsed) => {
            let content = parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message)
                .and_then(|m| m.content)
                .filter(|c| !c.is_empty());
            if let Some(text) = content {
                return CompletionReply::Text {
                    text,
                    source: ExtractionSource::Structured,
                };
            }
            if parsed.error.is_some() {
                // An error object may nest its own "content" field.
                tracing::warn!(body = %raw, "Chat completion returned an error object");
                return CompletionReply::Empty;
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "Chat completion body did not match the expected shape");
        }
    }

    match scan_content_field(raw) {
        Some(text) if !text.is_empty() => {
            tracing::warn!("Chat completion text recovered by content scan");
            CompletionReply::Text {
                text,
                source: ExtractionSource::Heuristic,
            }
        }
        _ => CompletionReply::Empty,
    }
}

/// Degraded extraction: the first quoted value of a `"content"` key.
///
/// Not a JSON parser. The key match is ASCII case-insensitive; `\n`, `\r`
/// and `\t` are unescaped, any other escaped character is taken literally,
/// and the value ends at the first unescaped quote (or end of input).
pub fn scan_content_field(raw: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets valid for `raw`.
    let key = raw.to_ascii_lowercase().find("\"content\"")?;
    let colon = key + raw[key..].find(':')?;

    let mut chars = raw[colon + 1..].chars().skip_while(|c| *c == ' ' || *c == '\t');
    if chars.next()? != '"' {
        return None;
    }

    let mut out = String::new();
    let mut escaped = false;
    for c in chars {
        if escaped {
            out.push(match c {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                other => other,
            });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            break;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

// =============================================================================
// OpenAI API types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    #[allow(dead_code)]
    role: Option<String>,
    #[serde(default)]
    content: Option<String>,
}
