//! Input hygiene for free-text fields.
//!
//! `sanitize` is a defense-in-depth filter, not the primary output-escaping
//! control. Size ceilings are applied by callers at the input edge through
//! [`clamp_input`], so the store only ever sees values within bounds.

use crate::error::ValidationError;

/// Maximum prompt length, in characters.
pub const MAX_PROMPT_LENGTH: usize = 2000;

/// Maximum log payload length, in characters.
pub const MAX_LOG_LENGTH: usize = 50_000;

/// Strip `<` and `>` so pasted markup cannot become tags downstream.
pub fn sanitize(input: &str) -> String {
    input.chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

/// Result of running raw input through the edge checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClampedInput {
    /// Sanitized text, truncated to the ceiling when necessary.
    pub value: String,
    /// Set when the sanitized text exceeded the ceiling.
    pub error: Option<ValidationError>,
}

/// Which ceiling applies to an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Prompt,
    Logs,
}

impl InputField {
    pub fn limit(self) -> usize {
        match self {
            Self::Prompt => MAX_PROMPT_LENGTH,
            Self::Logs => MAX_LOG_LENGTH,
        }
    }

    fn overflow_error(self) -> ValidationError {
        match self {
            Self::Prompt => ValidationError::PromptTooLong {
                limit: MAX_PROMPT_LENGTH,
            },
            Self::Logs => ValidationError::LogsTooLong {
                limit: MAX_LOG_LENGTH,
            },
        }
    }
}

/// Sanitize `raw`, then truncate it to the field's ceiling.
pub fn clamp_input(raw: &str, field: InputField) -> ClampedInput {
    let sanitized = sanitize(raw);
    let limit = field.limit();

    match sanitized.char_indices().nth(limit) {
        Some((cut, _)) => {
            let mut value = sanitized;
            value.truncate(cut);
            ClampedInput {
                value,
                error: Some(field.overflow_error()),
            }
        }
        None => ClampedInput {
            value: sanitized,
            error: None,
        },
    }
}

/// First `max_chars` characters of `input`, on a char boundary.
pub fn char_prefix(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((cut, _)) => &input[..cut],
        None => input,
    }
}
