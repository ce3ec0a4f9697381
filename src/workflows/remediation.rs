use super::{BusyGuard, ErrorSlot, Outcome, Precondition};
use crate::config::RemediationConfig;
use crate::gateway::AiGateway;
use crate::security::char_prefix;
use crate::session::{SessionState, SessionStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Keeps the remediation plan in step with the other tools' output.
///
/// Plans are derived data: they are never written to history.
pub struct RemediationController {
    store: Arc<SessionStore>,
    gateway: AiGateway,
    settings: RemediationConfig,
    loading: AtomicBool,
    error: ErrorSlot,
}

impl RemediationController {
    pub fn new(
        store: Arc<SessionStore>,
        gateway: AiGateway,
        settings: RemediationConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            gateway,
            settings,
            loading: AtomicBool::new(false),
            error: ErrorSlot::default(),
        })
    }

    pub fn build_context(&self) -> String {
        build_context(&self.store.snapshot(), self.settings.raw_log_excerpt_chars)
    }

    /// Whether any upstream tool has produced input for the plan.
    pub fn has_context(&self) -> bool {
        has_context(&self.store.snapshot())
    }

    /// Rebuild the plan from the current context.
    ///
    /// Without a credential the plan is cleared and no banner is raised.
    pub async fn refresh(&self) -> Outcome {
        let Some(credential) = self.store.credential() else {
            self.store.set_remediation_plan(Vec::new());
            return Outcome::Blocked(Precondition::MissingCredential);
        };
        let Some(_busy) = BusyGuard::claim(&self.loading) else {
            return Outcome::Blocked(Precondition::Busy);
        };

        self.error.set(None);
        let context = self.build_context();
        self.store.set_remediation_plan(Vec::new());

        match self.gateway.remediation_advice(&credential, &context).await {
            Ok(plan) => {
                info!(recommendations = plan.len(), "remediation plan ready");
                self.store.set_remediation_plan(plan);
                Outcome::Completed
            }
            Err(error) => {
                warn!(kind = ?error.kind(), "remediation advice failed: {error}");
                let message = error.user_message();
                self.error.set(Some(message.clone()));
                Outcome::Failed(message)
            }
        }
    }

    /// Refresh now, then again after every store revision.
    ///
    /// Revisions that land while a refresh is running collapse into a single
    /// follow-up. The task ends once the controller is dropped.
    pub fn spawn_reactive(self: &Arc<Self>) -> JoinHandle<()> {
        let mut revisions = self.store.subscribe();
        let controller: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                let Some(this) = controller.upgrade() else {
                    break;
                };
                let outcome = this.refresh().await;
                debug!(?outcome, revision = *revisions.borrow(), "remediation refresh");
                drop(this);

                if revisions.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn dismiss_error(&self) {
        self.error.set(None);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }
}

fn has_context(state: &SessionState) -> bool {
    !state.logs.analysis.is_empty()
        || !state.logs.logs.is_empty()
        || !state.script.generated_script.is_empty()
        || state.script.evaluation.is_some()
}

/// Compose the advice context. Analysis wins over raw logs and the
/// evaluation wins over the raw script.
pub fn build_context(state: &SessionState, raw_log_excerpt_chars: usize) -> String {
    let mut parts = Vec::new();

    if !state.logs.analysis.is_empty() {
        parts.push(format!("## Log Analysis Report\n{}", state.logs.analysis));
    } else if !state.logs.logs.is_empty() {
        parts.push(format!(
            "## Raw Logs Provided\n{}...",
            char_prefix(&state.logs.logs, raw_log_excerpt_chars)
        ));
    }

    if let Some(evaluation) = &state.script.evaluation {
        let findings = serde_json::to_string_pretty(&evaluation.vulnerabilities).unwrap_or_default();
        parts.push(format!("## Script Evaluation\n{findings}"));
    } else if !state.script.generated_script.is_empty() {
        parts.push(format!(
            "## Generated {} Script\n{}",
            state.script.kind, state.script.generated_script
        ));
    }

    if parts.is_empty() {
        return format!(
            "No specific context. Provide general system hardening tips for a {} environment.",
            state.script.kind.environment()
        );
    }
    format!("Context:\n\n{}", parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::gateway::testing::ScriptedProvider;
    use crate::gateway::{
        EvaluationResult, Priority, RemediationCategory, RiskLevel, ScriptKind, Vulnerability,
        VulnerabilityCategory,
    };
    use crate::security::Credential;
    use crate::session::{MemoryHistoryStorage, ProcessCredentialStorage};
    use std::time::Duration;

    const PLAN_REPLY: &str = r#"[{
        "title": "Block the offending address",
        "category": "Network Security",
        "details": ["Add a firewall rule for 10.0.0.5"],
        "priority": "High"
    }]"#;

    fn setup(
        credential: Option<&str>,
    ) -> (
        Arc<ScriptedProvider>,
        Arc<SessionStore>,
        Arc<RemediationController>,
    ) {
        let provider = ScriptedProvider::new();
        let credentials = match credential.and_then(Credential::parse) {
            Some(credential) => ProcessCredentialStorage::with_credential(credential),
            None => ProcessCredentialStorage::new(),
        };
        let store = Arc::new(SessionStore::init(
            Box::new(credentials),
            Box::new(MemoryHistoryStorage::new()),
        ));
        let controller = RemediationController::new(
            store.clone(),
            AiGateway::new(provider.clone()),
            RemediationConfig::default(),
        );
        (provider, store, controller)
    }

    #[test]
    fn empty_state_asks_for_platform_hardening() {
        let mut state = SessionState::default();
        assert_eq!(
            build_context(&state, 1000),
            "No specific context. Provide general system hardening tips for a Windows environment."
        );
        state.script.kind = ScriptKind::Bash;
        assert!(build_context(&state, 1000).contains("Linux environment"));
        assert!(!has_context(&state));
    }

    #[test]
    fn raw_logs_are_excerpted() {
        let mut state = SessionState::default();
        state.logs.logs = "a".repeat(1500);
        let context = build_context(&state, 1000);

        let expected = format!("Context:\n\n## Raw Logs Provided\n{}...", "a".repeat(1000));
        assert_eq!(context, expected);
    }

    #[test]
    fn analysis_and_evaluation_take_precedence() {
        let mut state = SessionState::default();
        state.logs.logs = "raw log line".into();
        state.logs.analysis = "## Executive Summary".into();
        state.script.generated_script = "Get-Process".into();
        state.script.evaluation = Some(EvaluationResult {
            vulnerabilities: vec![Vulnerability {
                category: VulnerabilityCategory::CommandInjection,
                risk_level: RiskLevel::High,
                line_number: "3".into(),
                explanation: "Invoke-Expression on input".into(),
                recommendation: "Avoid iex".into(),
            }],
            improved_script: "Get-Process".into(),
        });

        let context = build_context(&state, 1000);
        assert!(context.contains("## Log Analysis Report\n## Executive Summary"));
        assert!(!context.contains("raw log line"));
        assert!(context.contains("## Script Evaluation\n["));
        assert!(context.contains("\"vulnerabilityType\": \"Command Injection\""));
        assert!(!context.contains("## Generated"));
    }

    #[test]
    fn generated_script_is_labelled_with_kind() {
        let mut state = SessionState::default();
        state.script.kind = ScriptKind::Bash;
        state.script.generated_script = "ps aux".into();
        assert_eq!(
            build_context(&state, 1000),
            "Context:\n\n## Generated Bash Script\nps aux"
        );
        assert!(has_context(&state));
    }

    #[tokio::test]
    async fn missing_credential_clears_plan_silently() {
        let (provider, store, controller) = setup(None);
        store.set_remediation_plan(vec![crate::gateway::RemediationRecommendation {
            title: "stale".into(),
            category: RemediationCategory::General,
            details: vec![],
            priority: Priority::Low,
        }]);

        assert_eq!(
            controller.refresh().await,
            Outcome::Blocked(Precondition::MissingCredential)
        );
        assert!(store.remediation_plan().is_empty());
        assert!(controller.last_error().is_none());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn refresh_stores_plan_without_touching_history() {
        let (provider, store, controller) = setup(Some("k"));
        provider.reply(Ok(PLAN_REPLY));

        assert_eq!(controller.refresh().await, Outcome::Completed);
        let plan = store.remediation_plan();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].category, RemediationCategory::NetworkSecurity);
        assert_eq!(plan[0].priority, Priority::High);
        assert!(store.history().is_empty());
    }

    #[tokio::test]
    async fn refresh_failure_raises_banner() {
        let (provider, store, controller) = setup(Some("k"));
        provider.reply(Err(GatewayError::Network("timed out".into())));

        let outcome = controller.refresh().await;
        assert!(matches!(outcome, Outcome::Failed(ref m) if m.contains("timed out")));
        assert!(controller.last_error().is_some());
        assert!(store.remediation_plan().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reactive_refresh_coalesces_revisions() {
        let (provider, store, controller) = setup(Some("k"));
        provider
            .reply_after(Duration::from_secs(2), Ok(PLAN_REPLY))
            .reply(Ok("[]"));

        let task = controller.spawn_reactive();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(provider.calls().len(), 1);

        store.set_logs("first".into());
        store.set_logs("second".into());
        store.set_script_kind(ScriptKind::Bash);

        tokio::time::sleep(Duration::from_secs(3)).await;
        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].request.prompt.contains("second..."));
        assert!(store.remediation_plan().is_empty());

        // Prompt edits do not advance the revision.
        store.set_prompt("typing".into());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(provider.calls().len(), 2);

        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn reactive_refresh_follows_credential_changes() {
        let (provider, store, controller) = setup(None);
        provider.reply(Ok(PLAN_REPLY));

        let task = controller.spawn_reactive();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(provider.calls().is_empty());

        store.set_credential(Credential::parse("abc123"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(provider.calls().len(), 1);
        assert_eq!(provider.calls()[0].credential, "abc123");
        assert_eq!(store.remediation_plan().len(), 1);

        task.abort();
    }
}
