use super::{BusyGuard, Debouncer, ErrorSlot, Outcome, Precondition};
use crate::config::SuggestionConfig;
use crate::error::{GatewayError, ValidationError};
use crate::gateway::{AiGateway, ScriptKind};
use crate::security::{InputField, clamp_input};
use crate::session::{HistoryItem, ScriptSlice, SessionStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Script generation, evaluation and debounced prompt suggestions.
pub struct ScriptController {
    store: Arc<SessionStore>,
    gateway: AiGateway,
    settings: SuggestionConfig,
    /// Held by generation and evaluation alike; they never overlap.
    busy: AtomicBool,
    evaluating: AtomicBool,
    suggesting: AtomicBool,
    suggestions: Mutex<Vec<String>>,
    validation_error: Mutex<Option<ValidationError>>,
    error: ErrorSlot,
    debouncer: Debouncer,
}

impl ScriptController {
    pub fn new(
        store: Arc<SessionStore>,
        gateway: AiGateway,
        settings: SuggestionConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            gateway,
            settings,
            busy: AtomicBool::new(false),
            evaluating: AtomicBool::new(false),
            suggesting: AtomicBool::new(false),
            suggestions: Mutex::new(Vec::new()),
            validation_error: Mutex::new(None),
            error: ErrorSlot::default(),
            debouncer: Debouncer::new(),
        })
    }

    // ── Input ────────────────────────────────────────────────────

    /// Sanitize and clamp `raw` into the prompt, then restart the suggestion
    /// timer. Returns the ceiling violation, if any.
    pub fn update_prompt(self: &Arc<Self>, raw: &str) -> Option<ValidationError> {
        let clamped = clamp_input(raw, InputField::Prompt);
        self.store.set_prompt(clamped.value);
        *self
            .validation_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = clamped.error.clone();

        self.set_suggestions(Vec::new());
        self.schedule_suggestions();
        clamped.error
    }

    pub fn set_script_kind(&self, kind: ScriptKind) {
        self.store.set_script_kind(kind);
    }

    pub fn validation_error(&self) -> Option<ValidationError> {
        self.validation_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ── Suggestions ──────────────────────────────────────────────

    fn schedule_suggestions(self: &Arc<Self>) {
        self.debouncer.cancel();
        if !self.settings.enabled || !self.store.has_credential() {
            return;
        }
        let length = self.store.script().prompt.chars().count();
        if length < self.settings.min_prompt_chars {
            return;
        }

        let controller: Weak<Self> = Arc::downgrade(self);
        self.debouncer
            .schedule(Duration::from_millis(self.settings.debounce_ms), async move {
                if let Some(controller) = controller.upgrade() {
                    let outcome = controller.fetch_suggestions().await;
                    debug!(?outcome, "debounced suggestion fetch");
                }
            });
    }

    /// Fetch suggestions for the current prompt now. Failures are logged and
    /// never reach the error banner.
    pub async fn fetch_suggestions(&self) -> Outcome {
        if self.is_generating() {
            return Outcome::Blocked(Precondition::Busy);
        }
        let Some(_busy) = BusyGuard::claim(&self.suggesting) else {
            return Outcome::Blocked(Precondition::Busy);
        };
        let Some(credential) = self.store.credential() else {
            return Outcome::Blocked(Precondition::MissingCredential);
        };
        let prompt = self.store.script().prompt;
        if prompt.trim().is_empty() {
            return Outcome::Blocked(Precondition::EmptyInput);
        }

        match self.gateway.prompt_suggestions(&credential, &prompt).await {
            Ok(suggestions) => {
                self.set_suggestions(suggestions);
                Outcome::Completed
            }
            Err(error) => {
                warn!("failed to fetch prompt suggestions: {error}");
                Outcome::Failed(error.user_message())
            }
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_suggestions(&self, suggestions: Vec<String>) {
        *self
            .suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = suggestions;
    }

    /// Replace the prompt with suggestion `index`.
    pub fn select_suggestion(&self, index: usize) -> Option<String> {
        let chosen = self.suggestions().get(index).cloned()?;
        self.debouncer.cancel();
        let clamped = clamp_input(&chosen, InputField::Prompt);
        self.store.set_prompt(clamped.value.clone());
        self.set_suggestions(Vec::new());
        Some(clamped.value)
    }

    // ── Generation ───────────────────────────────────────────────

    pub async fn generate(&self) -> Outcome {
        let script = self.store.script();
        if script.prompt.trim().is_empty() {
            return Outcome::Blocked(Precondition::EmptyInput);
        }
        let Some(credential) = self.store.credential() else {
            return Outcome::Blocked(Precondition::MissingCredential);
        };
        let Some(_busy) = BusyGuard::claim(&self.busy) else {
            return Outcome::Blocked(Precondition::Busy);
        };

        self.error.set(None);
        self.store.set_generated_script(String::new());
        self.store.set_evaluation(None);
        self.debouncer.cancel();
        self.set_suggestions(Vec::new());

        let result = self
            .gateway
            .generate_script(&credential, &script.prompt, script.kind)
            .await;
        match result {
            Ok(generated) => {
                info!(kind = %script.kind, chars = generated.len(), "script generated");
                self.store.set_generated_script(generated.clone());
                self.store.add_history_item(HistoryItem::from_script(&ScriptSlice {
                    generated_script: generated,
                    evaluation: None,
                    ..script
                }));
                Outcome::Completed
            }
            Err(error) => self.fail("script generation", &error),
        }
    }

    pub async fn evaluate(&self) -> Outcome {
        let script = self.store.script();
        if script.generated_script.is_empty() {
            return Outcome::Blocked(Precondition::NothingToEvaluate);
        }
        let Some(credential) = self.store.credential() else {
            return Outcome::Blocked(Precondition::MissingCredential);
        };
        let Some(_busy) = BusyGuard::claim(&self.busy) else {
            return Outcome::Blocked(Precondition::Busy);
        };
        let _stage = BusyGuard::claim(&self.evaluating);

        self.error.set(None);
        self.store.set_evaluation(None);

        let result = self
            .gateway
            .evaluate_script(&credential, &script.generated_script, script.kind)
            .await;
        match result {
            Ok(evaluation) => {
                info!(
                    findings = evaluation.vulnerabilities.len(),
                    "script evaluated"
                );
                self.store.set_evaluation(Some(evaluation.clone()));
                self.store.add_history_item(HistoryItem::from_script(&ScriptSlice {
                    evaluation: Some(evaluation),
                    ..script
                }));
                Outcome::Completed
            }
            Err(error) => self.fail("script evaluation", &error),
        }
    }

    fn fail(&self, operation: &str, error: &GatewayError) -> Outcome {
        warn!(kind = ?error.kind(), "{operation} failed: {error}");
        let message = error.user_message();
        self.error.set(Some(message.clone()));
        Outcome::Failed(message)
    }

    // ── Transient state ──────────────────────────────────────────

    pub fn last_error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn dismiss_error(&self) {
        self.error.set(None);
    }

    pub fn is_generating(&self) -> bool {
        self.busy.load(Ordering::Acquire) && !self.evaluating.load(Ordering::Acquire)
    }

    pub fn is_evaluating(&self) -> bool {
        self.evaluating.load(Ordering::Acquire)
    }

    pub fn is_suggesting(&self) -> bool {
        self.suggesting.load(Ordering::Acquire)
    }
}
