//! Response-schema descriptors for structured requests, and the decode step
//! that turns a model reply into a typed value.

use crate::error::GatewayError;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Schema for `evaluate_script`: findings plus a rewritten script.
pub fn evaluation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "vulnerabilities": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "vulnerabilityType": { "type": "STRING" },
                        "riskLevel": { "type": "STRING" },
                        "lineNumber": { "type": "STRING" },
                        "explanation": { "type": "STRING" },
                        "recommendation": { "type": "STRING" }
                    },
                    "required": [
                        "vulnerabilityType",
                        "riskLevel",
                        "lineNumber",
                        "explanation",
                        "recommendation"
                    ]
                }
            },
            "improvedScript": { "type": "STRING" }
        },
        "required": ["vulnerabilities", "improvedScript"]
    })
}

/// Schema for `remediation_advice`: an array of recommendation records.
pub fn remediation_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "category": { "type": "STRING" },
                "details": { "type": "ARRAY", "items": { "type": "STRING" } },
                "priority": { "type": "STRING" }
            },
            "required": ["title", "category", "details", "priority"]
        }
    })
}

/// Schema for `prompt_suggestions`: a flat array of strings.
pub fn suggestions_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

/// Decode a structured reply into `T`.
///
/// Models occasionally wrap JSON in a Markdown fence even in JSON mode; one
/// surrounding fence is tolerated. Anything else that does not match `T` is a
/// [`GatewayError::Parse`].
pub fn decode<T: DeserializeOwned>(reply: &str, what: &str) -> Result<T, GatewayError> {
    let body = strip_code_fence(reply.trim());
    serde_json::from_str(body).map_err(|error| {
        tracing::debug!(%error, what, "structured reply did not match schema");
        GatewayError::Parse(format!("{what}: {error}"))
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (`json`) on the opening line.
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}
