//! Google Gemini backend (`generateContent`).
//!
//! Gemini has no system role in the shape used here, so the message
//! sequence is flattened into one prompt, one `ROLE: content` block per
//! message.

use super::http;
use crate::config::FileGeminiConfig;
use rescue_application::ports::llm_gateway::{CompletionRequest, GatewayError, TextProvider};
use rescue_domain::Message;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::debug;

const NAME: &str = "gemini";

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    default_model: String,
}

impl GeminiProvider {
    pub fn from_config(config: &FileGeminiConfig) -> Result<Self, GatewayError> {
        let api_key = http::resolve_api_key(NAME, config.api_key.as_deref(), &config.api_key_env)?;
        Ok(Self {
            client: http::build_client(NAME, config.timeout_secs)?,
            base_url: config.base_url.clone(),
            api_key,
            default_model: config.default_model.clone(),
        })
    }
}

fn flatten_prompt(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role().as_str().to_uppercase(), m.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn request_body(messages: &[Message], request: &CompletionRequest) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{"text": flatten_prompt(messages)}],
        }],
        "generationConfig": {"temperature": request.temperature},
    })
}

fn reply_text(body: &Value) -> Option<String> {
    let parts = body.pointer("/candidates/0/content/parts")?.as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

impl TextProvider for GeminiProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn complete(
        &self,
        messages: &[Message],
        request: &CompletionRequest,
    ) -> Result<String, GatewayError> {
        let url = http::join_url(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", request.model),
        );
        debug!("POST {} ({} messages)", url, messages.len());
        let body = http::send_json(
            NAME,
            self.client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body(messages, request)),
        )?;
        reply_text(&body).ok_or_else(|| http::missing_text(NAME))
    }
}
