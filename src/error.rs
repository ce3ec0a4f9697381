use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `forensight`.
///
/// Each subsystem defines its own error type. Library callers can match on
/// these to decide how to surface a failure; the binary wraps everything in
/// `anyhow::Result` for context chains.
#[derive(Debug, Error)]
pub enum ForensightError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Input validation ────────────────────────────────────────────────
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    // ── AI gateway ──────────────────────────────────────────────────────
    #[error("gateway: {0}")]
    Gateway(#[from] GatewayError),

    // ── Local persistence ───────────────────────────────────────────────
    #[error("persistence: {0}")]
    Persistence(#[from] PersistenceError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Invalid(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Validation errors ───────────────────────────────────────────────────────

/// Raised at the input edge when sanitized text exceeds its ceiling.
///
/// The store still receives the truncated value, which remains submittable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Prompt cannot exceed {limit} characters.")]
    PromptTooLong { limit: usize },

    #[error("Log data cannot exceed {limit} characters.")]
    LogsTooLong { limit: usize },
}

// ─── Gateway errors ──────────────────────────────────────────────────────────

/// Coarse classification of a failed gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    Auth,
    Network,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The provider rejected the credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The call failed before or without a usable response.
    #[error("request failed: {0}")]
    Network(String),

    /// The provider answered, but the payload did not match the expected shape.
    #[error("unexpected response format: {0}")]
    Parse(String),
}

const PARSE_FAILURE_MESSAGE: &str =
    "The AI service returned a response in an unexpected format. Please try again.";

impl GatewayError {
    pub fn kind(&self) -> GatewayErrorKind {
        match self {
            Self::Auth(_) => GatewayErrorKind::Auth,
            Self::Network(_) => GatewayErrorKind::Network,
            Self::Parse(_) => GatewayErrorKind::Parse,
        }
    }

    /// Text for the dismissible error banner.
    ///
    /// Auth and network failures are shown verbatim. Parse failures collapse to
    /// one generic sentence; the decode detail only goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(message) => format!(
                "Authentication failed: {}. Check your API key and Google AI settings.",
                sentence_body(message)
            ),
            Self::Network(message) => format!(
                "Request failed: {}. Check your network connection and try again.",
                sentence_body(message)
            ),
            Self::Parse(_) => PARSE_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Provider text usually ends with its own full stop.
fn sentence_body(message: &str) -> &str {
    message.trim_end().trim_end_matches('.')
}

// ─── Persistence errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {what}: {source}")]
    Read {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {what}: {source}")]
    Write {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ForensightError>;
