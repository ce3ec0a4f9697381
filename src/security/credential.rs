use std::fmt;
use zeroize::Zeroizing;

/// Opaque bearer value for the generative-model service.
///
/// The buffer is wiped on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Build a credential from user input. Surrounding whitespace is dropped;
    /// blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(Zeroizing::new(trimmed.to_string())))
        }
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Short, non-reversible hint for status lines (`AIza…9xQ`).
    pub fn masked(&self) -> String {
        let value = self.expose();
        let count = value.chars().count();
        if count <= 8 {
            return "•".repeat(count);
        }
        let head: String = value.chars().take(4).collect();
        let tail: String = value.chars().skip(count - 3).collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}
