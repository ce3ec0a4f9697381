//! Wiring: builds the store, gateway and controllers from configuration and
//! runs them behind the CLI.

pub mod dispatch;
pub mod shell;

use crate::config::Config;
use crate::gateway::AiGateway;
use crate::llm::{GeminiProvider, Provider};
use crate::session::{
    CREDENTIAL_ENV_VARS, CredentialStorage, HistoryStorage, JsonFileHistoryStorage,
    MemoryHistoryStorage, ProcessCredentialStorage, SessionStore, View,
};
use crate::workflows::{LogController, RemediationController, ScriptController};
use anyhow::{Context, Result, bail};
use dialoguer::Password;
use std::io::IsTerminal;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::debug;

pub struct App {
    pub config: Config,
    pub store: Arc<SessionStore>,
    pub script: Arc<ScriptController>,
    pub logs: LogController,
    pub remediation: Arc<RemediationController>,
    reactive: Mutex<Option<JoinHandle<()>>>,
}

impl App {
    pub fn new(
        config: Config,
        provider: Arc<dyn Provider>,
        credentials: Box<dyn CredentialStorage>,
        history: Box<dyn HistoryStorage>,
    ) -> Self {
        let store = Arc::new(SessionStore::init(credentials, history));
        let gateway =
            AiGateway::new(provider).with_max_suggestions(config.suggestions.max_suggestions);

        let script = ScriptController::new(
            Arc::clone(&store),
            gateway.clone(),
            config.suggestions.clone(),
        );
        let logs = LogController::new(Arc::clone(&store), gateway.clone());
        let remediation =
            RemediationController::new(Arc::clone(&store), gateway, config.remediation.clone());

        Self {
            config,
            store,
            script,
            logs,
            remediation,
            reactive: Mutex::new(None),
        }
    }

    /// Gemini transport, credential from the environment, history on disk
    /// unless `persist_history` is off.
    pub fn from_config(config: Config, persist_history: bool) -> Self {
        let provider: Arc<dyn Provider> = Arc::new(GeminiProvider::new(&config.provider));
        let credentials = Box::new(ProcessCredentialStorage::from_env(CREDENTIAL_ENV_VARS));
        let history: Box<dyn HistoryStorage> = if persist_history {
            Box::new(JsonFileHistoryStorage::new(config.history_path()))
        } else {
            Box::new(MemoryHistoryStorage::new())
        };
        Self::new(config, provider, credentials, history)
    }

    /// Switch views. The remediation plan only tracks upstream changes while
    /// its view is active.
    pub fn set_view(&self, view: View) {
        self.store.set_active_view(view);
        self.sync_reactive_remediation();
    }

    /// Start or stop the reactive remediation task to match the active view.
    pub fn sync_reactive_remediation(&self) {
        let wanted =
            self.store.active_view() == View::Remediation && self.config.remediation.auto_refresh;
        let mut reactive = self.reactive.lock().unwrap_or_else(PoisonError::into_inner);
        match (wanted, reactive.is_some()) {
            (true, false) => {
                debug!("starting reactive remediation");
                *reactive = Some(self.remediation.spawn_reactive());
            }
            (false, true) => {
                debug!("stopping reactive remediation");
                if let Some(task) = reactive.take() {
                    task.abort();
                }
            }
            _ => {}
        }
    }

    pub fn is_reactive(&self) -> bool {
        self.reactive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Make sure a credential is held, asking on the terminal when needed.
    pub async fn ensure_credential(&self) -> Result<()> {
        if self.store.has_credential() {
            self.store.dismiss_credential_prompt();
            return Ok(());
        }
        acquire_credential(&self.store).await
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(task) = self
            .reactive
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

/// Ask for the credential until a non-blank value is entered.
pub async fn acquire_credential(store: &SessionStore) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!(
            "No API key set. Export {} or run interactively.",
            CREDENTIAL_ENV_VARS.join(" or ")
        );
    }
    store.request_credential_prompt();
    loop {
        let raw = tokio::task::spawn_blocking(read_credential)
            .await
            .context("Credential prompt task failed")??;
        if store.submit_credential(&raw) {
            return Ok(());
        }
    }
}

fn read_credential() -> Result<String> {
    Password::new()
        .with_prompt("Google AI API key (input hidden, kept for this session only)")
        .allow_empty_password(false)
        .interact()
        .context("Failed to read API key from terminal")
}
