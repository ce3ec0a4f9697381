use serde_json::Value;

/// Shape the provider is asked to reply in.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Prose or code, returned as-is.
    Text,
    /// JSON constrained by a response-schema descriptor.
    Json { schema: Value },
}

/// One single-turn request to the generative model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub format: ResponseFormat,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::Text,
        }
    }

    pub fn json(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::Json { schema },
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self.format, ResponseFormat::Json { .. })
    }
}
