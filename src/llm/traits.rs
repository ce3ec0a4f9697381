use super::types::GenerationRequest;
use crate::error::GatewayError;
use crate::security::Credential;
use std::future::Future;
use std::pin::Pin;

pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>>;

/// Transport to an external generative model.
///
/// Implementations return the model's raw reply text; turning it into typed
/// values is the gateway's job.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "gemini").
    fn name(&self) -> &str;

    fn generate<'a>(
        &'a self,
        credential: &'a Credential,
        request: &'a GenerationRequest,
    ) -> GenerateFuture<'a>;
}
