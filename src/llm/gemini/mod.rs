//! Google Gemini `generateContent` transport.
//!
//! The credential travels in the `x-goog-api-key` header, never in the URL,
//! so transport errors that echo the request URL cannot leak it.

use crate::config::ProviderConfig;
use crate::error::GatewayError;
use crate::llm::{
    build_provider_client, sanitize_api_error,
    traits::{GenerateFuture, Provider},
    types::{GenerationRequest, ResponseFormat},
};
use crate::security::Credential;
use reqwest::{Client, StatusCode};

mod types;
use types::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider bound to one model and endpoint.
pub struct GeminiProvider {
    base_url: String,
    model: String,
    temperature: f64,
    max_output_tokens: u32,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            client: build_provider_client(config),
        }
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/{}:generateContent",
            self.base_url,
            Self::model_name(&self.model)
        )
    }

    fn build_request(&self, request: &GenerationRequest) -> GenerateContentRequest {
        let (response_mime_type, response_schema) = match &request.format {
            ResponseFormat::Text => (None, None),
            ResponseFormat::Json { schema } => (Some("application/json"), Some(schema.clone())),
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
                response_mime_type,
                response_schema,
            },
        }
    }

    fn transport_error(error: &reqwest::Error, credential: &Credential) -> GatewayError {
        let detail = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            format!("could not connect to Gemini: {error}")
        } else {
            error.to_string()
        };
        GatewayError::Network(sanitize_api_error(&detail, Some(credential.expose())))
    }

    fn is_auth_failure(status: StatusCode, message: &str, api_status: Option<&str>) -> bool {
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return true;
        }
        status == StatusCode::BAD_REQUEST
            && (message.contains("API key")
                || message.contains("API_KEY_INVALID")
                || api_status == Some("UNAUTHENTICATED"))
    }

    async fn ensure_success_status(
        response: reqwest::Response,
        credential: &Credential,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (message, api_status) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => (envelope.error.message, envelope.error.status),
            Err(_) => (body, None),
        };
        let sanitized = sanitize_api_error(&message, Some(credential.expose()));

        if Self::is_auth_failure(status, &message, api_status.as_deref()) {
            Err(GatewayError::Auth(sanitized))
        } else {
            Err(GatewayError::Network(format!(
                "Gemini API error ({status}): {sanitized}"
            )))
        }
    }

    fn extract_text(result: GenerateContentResponse) -> Result<String, GatewayError> {
        if let Some(err) = result.error {
            let code = err.code.map(|c| format!(" {c}")).unwrap_or_default();
            return Err(GatewayError::Network(format!(
                "Gemini API error{code}: {}",
                sanitize_api_error(&err.message, None)
            )));
        }

        let candidate = result.candidates.and_then(|c| c.into_iter().next());
        let text = candidate
            .as_ref()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if !text.is_empty() {
            return Ok(text);
        }

        let reason = result
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .or_else(|| candidate.and_then(|candidate| candidate.finish_reason))
            .unwrap_or_else(|| "no candidates".to_string());
        Err(GatewayError::Parse(format!(
            "Gemini returned no text ({reason})"
        )))
    }

    async fn call_api(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> Result<String, GatewayError> {
        let body = self.build_request(request);
        tracing::debug!(
            model = %self.model,
            structured = request.is_structured(),
            prompt_chars = request.prompt.chars().count(),
            "sending Gemini request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::transport_error(&e, credential))?;

        let response = Self::ensure_success_status(response, credential).await?;
        let raw = response
            .text()
            .await
            .map_err(|e| Self::transport_error(&e, credential))?;

        let result: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| GatewayError::Parse(format!("invalid Gemini response envelope: {e}")))?;
        if let Some(version) = result.model_version.as_deref() {
            tracing::debug!(model_version = version, "Gemini response received");
        }

        Self::extract_text(result)
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate<'a>(
        &'a self,
        credential: &'a Credential,
        request: &'a GenerationRequest,
    ) -> GenerateFuture<'a> {
        Box::pin(async move { self.call_api(credential, request).await })
    }
}
