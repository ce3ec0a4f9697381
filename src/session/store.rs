use super::storage::{CredentialStorage, HistoryStorage};
use super::types::{
    HistoryEntry, HistoryItem, LogSlice, MAX_HISTORY_ITEMS, ScriptSlice, SessionState, View,
};
use crate::gateway::{EvaluationResult, RemediationRecommendation, ScriptKind};
use crate::security::Credential;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Process-wide state shared by every controller.
///
/// The lock is only held for short synchronous sections. Every change to the
/// credential or to a remediation input advances the revision published on
/// [`SessionStore::subscribe`].
pub struct SessionStore {
    state: Mutex<SessionState>,
    credentials: Box<dyn CredentialStorage>,
    history_storage: Box<dyn HistoryStorage>,
    revision: watch::Sender<u64>,
}

impl SessionStore {
    /// Load the credential and history. A missing credential opens the
    /// credential prompt; unreadable history starts empty.
    pub fn init(
        credentials: Box<dyn CredentialStorage>,
        history_storage: Box<dyn HistoryStorage>,
    ) -> Self {
        let credential = credentials.load();
        let history = match history_storage.load() {
            Ok(mut items) => {
                items.truncate(MAX_HISTORY_ITEMS);
                items
            }
            Err(error) => {
                warn!("discarding unreadable history: {error}");
                Vec::new()
            }
        };
        debug!(
            has_credential = credential.is_some(),
            history_items = history.len(),
            "session store initialized"
        );

        let state = SessionState {
            credential_prompt_open: credential.is_none(),
            credential,
            history,
            ..SessionState::default()
        };
        let (revision, _) = watch::channel(0);
        Self {
            state: Mutex::new(state),
            credentials,
            history_storage,
            revision,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Apply `f`, then bump the revision if it reports a change.
    fn update(&self, f: impl FnOnce(&mut SessionState) -> bool) -> bool {
        let changed = f(&mut self.lock());
        if changed {
            self.bump();
        }
        changed
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    // ── Credential ───────────────────────────────────────────────

    pub fn credential(&self) -> Option<Credential> {
        self.lock().credential.clone()
    }

    pub fn has_credential(&self) -> bool {
        self.lock().credential.is_some()
    }

    pub fn set_credential(&self, credential: Option<Credential>) {
        match &credential {
            Some(value) => self.credentials.store(value),
            None => self.credentials.clear(),
        }
        self.update(|state| {
            if state.credential == credential {
                return false;
            }
            state.credential = credential;
            true
        });
    }

    /// Accept a credential typed into the prompt. Blank input is ignored and
    /// leaves the prompt open.
    pub fn submit_credential(&self, raw: &str) -> bool {
        let Some(credential) = Credential::parse(raw) else {
            return false;
        };
        self.set_credential(Some(credential));
        self.lock().credential_prompt_open = false;
        true
    }

    /// The prompt is mandatory while no credential is held.
    pub fn dismiss_credential_prompt(&self) -> bool {
        let mut state = self.lock();
        if state.credential.is_none() {
            return false;
        }
        state.credential_prompt_open = false;
        true
    }

    pub fn request_credential_prompt(&self) {
        self.lock().credential_prompt_open = true;
    }

    pub fn credential_prompt_open(&self) -> bool {
        self.lock().credential_prompt_open
    }

    // ── Navigation ───────────────────────────────────────────────

    pub fn active_view(&self) -> View {
        self.lock().active_view
    }

    pub fn set_active_view(&self, view: View) {
        self.lock().active_view = view;
    }

    pub fn history_panel_open(&self) -> bool {
        self.lock().history_panel_open
    }

    pub fn set_history_panel_open(&self, open: bool) {
        self.lock().history_panel_open = open;
    }

    // ── Script slice ─────────────────────────────────────────────

    pub fn script(&self) -> ScriptSlice {
        self.lock().script.clone()
    }

    pub fn set_prompt(&self, prompt: String) {
        self.lock().script.prompt = prompt;
    }

    pub fn set_script_kind(&self, kind: ScriptKind) {
        self.update(|state| {
            if state.script.kind == kind {
                return false;
            }
            state.script.kind = kind;
            true
        });
    }

    pub fn set_generated_script(&self, script: String) {
        self.update(|state| {
            if state.script.generated_script == script {
                return false;
            }
            state.script.generated_script = script;
            true
        });
    }

    pub fn set_evaluation(&self, evaluation: Option<EvaluationResult>) {
        self.update(|state| {
            if state.script.evaluation == evaluation {
                return false;
            }
            state.script.evaluation = evaluation;
            true
        });
    }

    // ── Log slice ────────────────────────────────────────────────

    pub fn logs(&self) -> LogSlice {
        self.lock().logs.clone()
    }

    pub fn set_logs(&self, logs: String) {
        self.update(|state| {
            if state.logs.logs == logs {
                return false;
            }
            state.logs.logs = logs;
            true
        });
    }

    /// The focus term only shapes the next analysis, so it does not advance
    /// the revision.
    pub fn set_focus_term(&self, term: String) {
        self.lock().logs.focus_term = term;
    }

    pub fn set_analysis(&self, analysis: String) {
        self.update(|state| {
            if state.logs.analysis == analysis {
                return false;
            }
            state.logs.analysis = analysis;
            true
        });
    }

    // ── Remediation slice ────────────────────────────────────────

    pub fn remediation_plan(&self) -> Vec<RemediationRecommendation> {
        self.lock().remediation.plan.clone()
    }

    pub fn set_remediation_plan(&self, plan: Vec<RemediationRecommendation>) {
        self.lock().remediation.plan = plan;
    }

    // ── History ──────────────────────────────────────────────────

    pub fn history(&self) -> Vec<HistoryItem> {
        self.lock().history.clone()
    }

    /// Prepend `item`, evict past the cap and persist the whole sequence.
    pub fn add_history_item(&self, item: HistoryItem) {
        let items = {
            let mut state = self.lock();
            state.history.insert(0, item);
            state.history.truncate(MAX_HISTORY_ITEMS);
            state.history.clone()
        };
        self.persist_history(&items);
    }

    pub fn clear_history(&self) {
        self.lock().history.clear();
        self.persist_history(&[]);
    }

    /// Restore `item` into its tool. The other tool's slice and the
    /// remediation plan are cleared, and the view follows the item.
    pub fn load_from_history(&self, item: &HistoryItem) {
        {
            let mut state = self.lock();
            match &item.entry {
                HistoryEntry::Script {
                    prompt,
                    script_type,
                    generated_script,
                    evaluation_result,
                } => {
                    state.script = ScriptSlice {
                        prompt: prompt.clone(),
                        kind: *script_type,
                        generated_script: generated_script.clone(),
                        evaluation: evaluation_result.clone(),
                    };
                    state.logs = LogSlice::default();
                }
                HistoryEntry::Log {
                    logs,
                    focus_term,
                    analysis_result,
                } => {
                    state.logs = LogSlice {
                        logs: logs.clone(),
                        focus_term: focus_term.clone(),
                        analysis: analysis_result.clone(),
                    };
                    state.script = ScriptSlice::default();
                }
            }
            state.remediation.plan.clear();
            state.active_view = item.kind().view();
            state.history_panel_open = false;
        }
        debug!(id = %item.id, kind = %item.kind(), "restored history item");
        self.bump();
    }

    /// Restore by id. Returns `false` when no such item exists.
    pub fn restore_history(&self, id: &str) -> bool {
        let item = self.lock().history.iter().find(|item| item.id == id).cloned();
        match item {
            Some(item) => {
                self.load_from_history(&item);
                true
            }
            None => false,
        }
    }

    fn persist_history(&self, items: &[HistoryItem]) {
        if let Err(error) = self.history_storage.save(items) {
            warn!("failed to persist history: {error}");
        }
    }
}
