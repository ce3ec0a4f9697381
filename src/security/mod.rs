pub mod credential;
pub mod validation;

pub use credential::Credential;
pub use validation::{
    ClampedInput, InputField, MAX_LOG_LENGTH, MAX_PROMPT_LENGTH, char_prefix, clamp_input,
    sanitize,
};
