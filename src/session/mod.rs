//! Session state: the tool slices, the credential lifecycle and the bounded
//! history log, plus the storage seams they persist through.

pub mod storage;
pub mod store;
pub mod types;

pub use storage::{
    CREDENTIAL_ENV_VARS, CredentialStorage, HistoryStorage, JsonFileHistoryStorage,
    MemoryHistoryStorage, ProcessCredentialStorage,
};
pub use store::SessionStore;
pub use types::{
    HistoryEntry, HistoryItem, HistoryKind, LogSlice, MAX_HISTORY_ITEMS, RemediationSlice,
    ScriptSlice, SessionState, View,
};
