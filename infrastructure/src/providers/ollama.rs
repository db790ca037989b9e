//! Local Ollama backend (`/api/chat`, non-streaming).

use super::http;
use crate::config::FileOllamaConfig;
use rescue_application::ports::llm_gateway::{CompletionRequest, GatewayError, TextProvider};
use rescue_domain::Message;
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::debug;

const NAME: &str = "ollama";

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    default_model: String,
}

impl OllamaProvider {
    pub fn from_config(config: &FileOllamaConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: http::build_client(NAME, config.timeout_secs)?,
            base_url: config.base_url.clone(),
            default_model: config.default_model.clone(),
        })
    }
}

fn request_body(messages: &[Message], request: &CompletionRequest) -> Value {
    json!({
        "model": request.model,
        "messages": messages,
        "stream": false,
        "options": {"temperature": request.temperature},
    })
}

fn reply_text(body: &Value) -> Option<String> {
    body.pointer("/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl TextProvider for OllamaProvider {
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
        let url = http::join_url(&self.base_url, "api/chat");
        debug!("POST {} ({} messages)", url, messages.len());
        let body = http::send_json(
            NAME,
            self.client.post(&url).json(&request_body(messages, request)),
        )?;
        reply_text(&body).ok_or_else(|| http::missing_text(NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_disables_streaming() {
        let request = CompletionRequest {
            model: "gemma3n:e4b".to_string(),
            temperature: 0.0,
        };
        let body = request_body(&[Message::user("hi")], &request);
        assert_eq!(body["stream"], false);
        assert_eq!(body["model"], "gemma3n:e4b");
        assert_eq!(body["options"]["temperature"], 0.0);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_reply_text() {
        let body = json!({"model": "m", "message": {"role": "assistant", "content": "ok"}, "done": true});
        assert_eq!(reply_text(&body).as_deref(), Some("ok"));
        assert_eq!(reply_text(&json!({"error": "model not found"})), None);
    }

    #[test]
    fn test_unreachable_server_is_transient() {
        let config = FileOllamaConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..FileOllamaConfig::default()
        };
        let provider = OllamaProvider::from_config(&config).unwrap();
        let request = CompletionRequest {
            model: provider.default_model().to_string(),
            temperature: 0.2,
        };
        let err = provider.complete(&[Message::user("hi")], &request).unwrap_err();
        assert!(err.is_transient());
    }
}
