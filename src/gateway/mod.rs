//! Tool-level operations over the generative model.
//!
//! Free-text operations (script generation, log analysis) return the reply
//! verbatim. Structured operations send a response schema and run the reply
//! through [`schema::decode`], so a malformed payload surfaces as
//! [`GatewayError::Parse`] rather than as a transport failure.

pub mod prompts;
pub mod schema;
pub mod types;

pub use types::{
    EvaluationResult, Priority, RemediationCategory, RemediationRecommendation, RiskLevel,
    ScriptKind, Vulnerability, VulnerabilityCategory,
};

use crate::error::GatewayError;
use crate::llm::{GenerationRequest, Provider};
use crate::security::Credential;
use std::sync::Arc;
use tracing::debug;

/// Default cap on prompt suggestions.
pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Clone)]
pub struct AiGateway {
    provider: Arc<dyn Provider>,
    max_suggestions: usize,
}

impl AiGateway {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            max_suggestions: MAX_SUGGESTIONS,
        }
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions.max(1);
        self
    }

    /// Generate a script. The reply is assumed to be bare code.
    pub async fn generate_script(
        &self,
        credential: &Credential,
        prompt: &str,
        kind: ScriptKind,
    ) -> Result<String, GatewayError> {
        debug!(%kind, "generate_script");
        let request = GenerationRequest::text(prompts::script_generation(prompt, kind));
        self.provider.generate(credential, &request).await
    }

    pub async fn evaluate_script(
        &self,
        credential: &Credential,
        script: &str,
        kind: ScriptKind,
    ) -> Result<EvaluationResult, GatewayError> {
        debug!(%kind, "evaluate_script");
        let request = GenerationRequest::json(
            prompts::script_evaluation(script, kind),
            schema::evaluation_schema(),
        );
        let reply = self.provider.generate(credential, &request).await?;
        schema::decode(&reply, "script evaluation")
    }

    pub async fn analyze_logs(
        &self,
        logs: &str,
        credential: &Credential,
        focus_term: Option<&str>,
    ) -> Result<String, GatewayError> {
        debug!(focused = focus_term.is_some_and(|t| !t.trim().is_empty()), "analyze_logs");
        let request = GenerationRequest::text(prompts::log_analysis(logs, focus_term));
        self.provider.generate(credential, &request).await
    }

    pub async fn remediation_advice(
        &self,
        credential: &Credential,
        context: &str,
    ) -> Result<Vec<RemediationRecommendation>, GatewayError> {
        debug!(context_chars = context.chars().count(), "remediation_advice");
        let request =
            GenerationRequest::json(prompts::remediation(context), schema::remediation_schema());
        let reply = self.provider.generate(credential, &request).await?;
        schema::decode(&reply, "remediation plan")
    }

    /// Completion ideas for a partially typed prompt, at most
    /// `max_suggestions` of them.
    pub async fn prompt_suggestions(
        &self,
        credential: &Credential,
        partial: &str,
    ) -> Result<Vec<String>, GatewayError> {
        let request = GenerationRequest::json(
            prompts::prompt_suggestions(partial),
            schema::suggestions_schema(),
        );
        let reply = self.provider.generate(credential, &request).await?;
        let mut suggestions: Vec<String> = schema::decode(&reply, "prompt suggestions")?;
        suggestions.truncate(self.max_suggestions);
        Ok(suggestions)
    }
}
