//! Per-tool workflow controllers.
//!
//! Controllers hold only transient UI state (busy flags, error banners,
//! suggestions). Everything that outlives an operation goes through the
//! [`SessionStore`](crate::session::SessionStore).

pub mod debounce;
pub mod logs;
pub mod remediation;
pub mod script;

pub use debounce::Debouncer;
pub use logs::LogController;
pub use remediation::RemediationController;
pub use script::ScriptController;

use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, Ordering};
use strum::Display;

/// Why an action did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Precondition {
    #[strum(serialize = "no API key is set")]
    MissingCredential,
    #[strum(serialize = "input is empty")]
    EmptyInput,
    #[strum(serialize = "another request is already running")]
    Busy,
    #[strum(serialize = "there is no generated script to evaluate")]
    NothingToEvaluate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Blocked(Precondition),
    /// The gateway call failed; carries the banner text.
    Failed(String),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Clears its flag on drop, so an early return or a cancelled future
/// releases the slot.
pub(crate) struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    pub(crate) fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Dismissible error banner.
#[derive(Debug, Default)]
pub(crate) struct ErrorSlot(Mutex<Option<String>>);

impl ErrorSlot {
    pub(crate) fn get(&self) -> Option<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn set(&self, message: Option<String>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }
}
