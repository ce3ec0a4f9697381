use super::{BusyGuard, ErrorSlot, Outcome, Precondition};
use crate::error::ValidationError;
use crate::gateway::AiGateway;
use crate::security::{InputField, clamp_input, sanitize};
use crate::session::{HistoryItem, LogSlice, SessionStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

pub struct LogController {
    store: Arc<SessionStore>,
    gateway: AiGateway,
    analyzing: AtomicBool,
    validation_error: Mutex<Option<ValidationError>>,
    error: ErrorSlot,
}

impl LogController {
    pub fn new(store: Arc<SessionStore>, gateway: AiGateway) -> Self {
        Self {
            store,
            gateway,
            analyzing: AtomicBool::new(false),
            validation_error: Mutex::new(None),
            error: ErrorSlot::default(),
        }
    }

    /// Sanitize and clamp `raw` into the log slice.
    pub fn update_logs(&self, raw: &str) -> Option<ValidationError> {
        let clamped = clamp_input(raw, InputField::Logs);
        self.store.set_logs(clamped.value);
        *self
            .validation_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = clamped.error.clone();
        clamped.error
    }

    pub fn set_focus_term(&self, term: &str) {
        self.store.set_focus_term(sanitize(term));
    }

    pub async fn analyze(&self) -> Outcome {
        let slice = self.store.logs();
        if slice.logs.trim().is_empty() {
            return Outcome::Blocked(Precondition::EmptyInput);
        }
        let Some(credential) = self.store.credential() else {
            return Outcome::Blocked(Precondition::MissingCredential);
        };
        let Some(_busy) = BusyGuard::claim(&self.analyzing) else {
            return Outcome::Blocked(Precondition::Busy);
        };

        self.error.set(None);
        self.store.set_analysis(String::new());

        let focus = Some(slice.focus_term.as_str()).filter(|term| !term.trim().is_empty());
        let result = self
            .gateway
            .analyze_logs(&slice.logs, &credential, focus)
            .await;
        match result {
            Ok(report) => {
                info!(
                    log_chars = slice.logs.chars().count(),
                    focused = focus.is_some(),
                    "log analysis complete"
                );
                self.store.set_analysis(report.clone());
                self.store.add_history_item(HistoryItem::from_logs(&LogSlice {
                    analysis: report,
                    ..slice
                }));
                Outcome::Completed
            }
            Err(error) => {
                warn!(kind = ?error.kind(), "log analysis failed: {error}");
                let message = error.user_message();
                self.error.set(Some(message.clone()));
                Outcome::Failed(message)
            }
        }
    }

    pub fn validation_error(&self) -> Option<ValidationError> {
        self.validation_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn dismiss_error(&self) {
        self.error.set(None);
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing.load(Ordering::Acquire)
    }
}
