#![allow(dead_code)]

use forensight::Config;
use forensight::app::App;
use forensight::llm::GeminiProvider;
use forensight::security::Credential;
use forensight::session::{HistoryStorage, MemoryHistoryStorage, ProcessCredentialStorage};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const API_KEY: &str = "AIzaSy-test-key-0001";
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.provider.base_url = server.uri();
    config.provider.model = "gemini-test".into();
    config.suggestions.enabled = false;
    config.remediation.auto_refresh = false;
    config
}

pub fn app_with(
    config: Config,
    credential: Option<&str>,
    history: Box<dyn HistoryStorage>,
) -> App {
    let provider = Arc::new(GeminiProvider::new(&config.provider));
    let credentials = match credential.and_then(Credential::parse) {
        Some(credential) => ProcessCredentialStorage::with_credential(credential),
        None => ProcessCredentialStorage::new(),
    };
    App::new(config, provider, Box::new(credentials), history)
}

pub fn app(server: &MockServer) -> App {
    app_with(
        config_for(server),
        Some(API_KEY),
        Box::new(MemoryHistoryStorage::new()),
    )
}

/// Wrap `text` the way the generateContent endpoint returns it.
pub fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
}

pub fn json_reply(value: &Value) -> ResponseTemplate {
    reply(&value.to_string())
}

/// Free-text requests whose prompt mentions `needle`.
pub fn text_request(needle: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains(needle))
}

/// Requests that ask for a schema-constrained JSON reply.
pub fn structured_request() -> MockBuilder {
    Mock::given(method("POST")).and(path(GENERATE_PATH)).and(body_partial_json(
        json!({ "generationConfig": { "responseMimeType": "application/json" } }),
    ))
}

pub fn evaluation_payload() -> Value {
    json!({
        "vulnerabilities": [{
            "vulnerabilityType": "Sensitive Data Exposure",
            "riskLevel": "High",
            "lineNumber": "1",
            "explanation": "Process command lines can include credentials.",
            "recommendation": "Select only the Name and Id properties."
        }],
        "improvedScript": "Get-Process | Select-Object Name, Id"
    })
}

pub fn plan_payload() -> Value {
    json!([{
        "title": "Lock out repeated SSH failures",
        "category": "Network Security",
        "details": ["Enable fail2ban for sshd", "Disable password authentication"],
        "priority": "High"
    }])
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
