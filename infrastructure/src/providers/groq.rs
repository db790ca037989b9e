//! Groq backend (OpenAI-compatible chat completions).

use super::http;
use crate::config::FileGroqConfig;
use rescue_application::ports::llm_gateway::{CompletionRequest, GatewayError, TextProvider};
use rescue_domain::Message;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::debug;

const NAME: &str = "groq";

pub struct GroqProvider {
    client: Client,
    base_url: String,
    api_key: String,
    default_model: String,
}

impl GroqProvider {
    pub fn from_config(config: &FileGroqConfig) -> Result<Self, GatewayError> {
        let api_key = http::resolve_api_key(NAME, config.api_key.as_deref(), &config.api_key_env)?;
        Ok(Self {
            client: http::build_client(NAME, config.timeout_secs)?,
            base_url: config.base_url.clone(),
            api_key,
            default_model: config.default_model.clone(),
        })
    }
}

fn request_body(messages: &[Message], request: &CompletionRequest) -> Value {
    json!({
        "model": request.model,
        "messages": messages,
        "temperature": request.temperature,
    })
}

fn reply_text(body: &Value) -> Option<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl TextProvider for GroqProvider {
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
        let url = http::join_url(&self.base_url, "chat/completions");
        debug!("POST {} ({} messages)", url, messages.len());
        let body = http::send_json(
            NAME,
            self.client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body(messages, request)),
        )?;
        reply_text(&body).ok_or_else(|| http::missing_text(NAME))
    }
}
