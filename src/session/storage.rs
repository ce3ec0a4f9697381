use super::types::HistoryItem;
use crate::error::PersistenceError;
use crate::security::Credential;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Environment variables consulted for a credential at startup, in order.
pub const CREDENTIAL_ENV_VARS: &[&str] = &["FORENSIGHT_API_KEY", "GEMINI_API_KEY"];

/// Holds the credential for the lifetime of one session.
///
/// Implementations must not write the credential anywhere that outlives the
/// process.
pub trait CredentialStorage: Send + Sync {
    fn load(&self) -> Option<Credential>;
    fn store(&self, credential: &Credential);
    fn clear(&self);
}

/// Durable history persistence. `load` of an absent store yields an empty list.
pub trait HistoryStorage: Send + Sync {
    fn load(&self) -> Result<Vec<HistoryItem>, PersistenceError>;
    fn save(&self, items: &[HistoryItem]) -> Result<(), PersistenceError>;
}

// ── Credential ───────────────────────────────────────────────────

/// In-memory slot; the value is zeroized when replaced or dropped.
#[derive(Default)]
pub struct ProcessCredentialStorage {
    slot: Mutex<Option<Credential>>,
}

impl ProcessCredentialStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }

    /// Seed the slot from the first non-blank variable in `vars`.
    pub fn from_env(vars: &[&str]) -> Self {
        let credential = vars
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| Credential::parse(&value));
        Self {
            slot: Mutex::new(credential),
        }
    }
}

impl CredentialStorage for ProcessCredentialStorage {
    fn load(&self) -> Option<Credential> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, credential: &Credential) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
    }

    fn clear(&self) {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

// ── History ──────────────────────────────────────────────────────

/// JSON array of history items in a single file.
pub struct JsonFileHistoryStorage {
    path: PathBuf,
}

impl JsonFileHistoryStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStorage for JsonFileHistoryStorage {
    fn load(&self) -> Result<Vec<HistoryItem>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PersistenceError::Read {
                    what: "history file",
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| PersistenceError::Decode {
            what: "history file",
            source,
        })
    }

    fn save(&self, items: &[HistoryItem]) -> Result<(), PersistenceError> {
        let content =
            serde_json::to_string_pretty(items).map_err(|source| PersistenceError::Encode {
                what: "history",
                source,
            })?;
        write_atomic(&self.path, &content)
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<(), PersistenceError> {
    let write_err = |source| PersistenceError::Write {
        what: "history file",
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(write_err)?;

    if let Err(rename_error) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(write_err(rename_error));
    }
    Ok(())
}

/// Holds the serialized form in memory. Used by tests and by `--no-history`.
#[derive(Default)]
pub struct MemoryHistoryStorage {
    raw: Mutex<Option<String>>,
    fail_writes: Mutex<bool>,
}

impl MemoryHistoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from arbitrary stored text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
            fail_writes: Mutex::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self
            .fail_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = fail;
    }

    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HistoryStorage for MemoryHistoryStorage {
    fn load(&self) -> Result<Vec<HistoryItem>, PersistenceError> {
        match self.raw() {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(&raw).map_err(|source| PersistenceError::Decode {
                    what: "history",
                    source,
                })
            }
            _ => Ok(Vec::new()),
        }
    }

    fn save(&self, items: &[HistoryItem]) -> Result<(), PersistenceError> {
        if *self
            .fail_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
        {
            return Err(PersistenceError::Write {
                what: "history",
                source: std::io::Error::other("writes disabled"),
            });
        }
        let encoded = serde_json::to_string(items).map_err(|source| PersistenceError::Encode {
            what: "history",
            source,
        })?;
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(encoded);
        Ok(())
    }
}
