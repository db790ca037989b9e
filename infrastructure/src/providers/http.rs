//! Shared blocking HTTP plumbing for the remote backends.

use rescue_application::ports::llm_gateway::GatewayError;
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// Longest slice of an error body carried into a [`GatewayError`].
const ERROR_BODY_LIMIT: usize = 512;

pub(super) fn build_client(provider: &str, timeout_secs: u64) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .connect_timeout(Duration::from_secs(timeout_secs.clamp(1, 15)))
        .build()
        .map_err(|e| GatewayError::NotConfigured(format!("{provider}: http client: {e}")))
}

/// API key from the explicit value, else from the named environment variable.
pub(super) fn resolve_api_key(
    provider: &str,
    explicit: Option<&str>,
    env_name: &str,
) -> Result<String, GatewayError> {
    if let Some(key) = explicit.map(str::trim).filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    match std::env::var(env_name) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(GatewayError::NotConfigured(format!(
            "{provider}: no API key (set {env_name} or providers.{provider}.api_key)"
        ))),
    }
}

/// Send a JSON request and decode the JSON reply.
///
/// Transport faults, timeouts, non-success statuses and undecodable bodies
/// are all transient.
pub(super) fn send_json(provider: &str, request: RequestBuilder) -> Result<Value, GatewayError> {
    let response = request
        .send()
        .map_err(|e| GatewayError::Transient(format!("{provider} request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(GatewayError::Transient(format!(
            "{provider} returned HTTP {}: {}",
            status.as_u16(),
            truncate(&body, ERROR_BODY_LIMIT)
        )));
    }

    response
        .json::<Value>()
        .map_err(|e| GatewayError::Transient(format!("{provider} sent an undecodable body: {e}")))
}

pub(super) fn missing_text(provider: &str) -> GatewayError {
    GatewayError::Transient(format!("{provider} reply carried no text"))
}

pub(super) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
