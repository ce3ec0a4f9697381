use crate::gateway::{EvaluationResult, RemediationRecommendation, ScriptKind};
use crate::security::Credential;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Maximum number of retained history items.
pub const MAX_HISTORY_ITEMS: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum View {
    #[default]
    Script,
    Logs,
    Remediation,
}

// ── Tool slices ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSlice {
    pub prompt: String,
    pub kind: ScriptKind,
    pub generated_script: String,
    pub evaluation: Option<EvaluationResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSlice {
    pub logs: String,
    pub focus_term: String,
    pub analysis: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemediationSlice {
    pub plan: Vec<RemediationRecommendation>,
}

/// Everything the store owns, as one cloneable value.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub active_view: View,
    pub credential: Option<Credential>,
    pub credential_prompt_open: bool,
    pub history_panel_open: bool,
    pub script: ScriptSlice,
    pub logs: LogSlice,
    pub remediation: RemediationSlice,
    /// Most recent first.
    pub history: Vec<HistoryItem>,
}

// ── History ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HistoryKind {
    #[strum(serialize = "Script Generation")]
    Script,
    #[strum(serialize = "Log Analysis")]
    Log,
}

impl HistoryKind {
    pub fn view(self) -> View {
        match self {
            Self::Script => View::Script,
            Self::Log => View::Logs,
        }
    }
}

/// Slice values captured when an operation completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HistoryEntry {
    #[serde(rename = "Script Generation", rename_all = "camelCase")]
    Script {
        prompt: String,
        script_type: ScriptKind,
        generated_script: String,
        #[serde(default)]
        evaluation_result: Option<EvaluationResult>,
    },
    #[serde(rename = "Log Analysis", rename_all = "camelCase")]
    Log {
        logs: String,
        #[serde(default)]
        focus_term: String,
        analysis_result: String,
    },
}

/// Immutable snapshot of one completed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: HistoryEntry,
}

impl HistoryItem {
    pub fn new(entry: HistoryEntry) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            entry,
        }
    }

    /// Snapshot of the script slice. The item owns copies, so later edits to
    /// the slice do not reach it.
    pub fn from_script(slice: &ScriptSlice) -> Self {
        Self::new(HistoryEntry::Script {
            prompt: slice.prompt.clone(),
            script_type: slice.kind,
            generated_script: slice.generated_script.clone(),
            evaluation_result: slice.evaluation.clone(),
        })
    }

    pub fn from_logs(slice: &LogSlice) -> Self {
        Self::new(HistoryEntry::Log {
            logs: slice.logs.clone(),
            focus_term: slice.focus_term.clone(),
            analysis_result: slice.analysis.clone(),
        })
    }

    pub fn kind(&self) -> HistoryKind {
        match self.entry {
            HistoryEntry::Script { .. } => HistoryKind::Script,
            HistoryEntry::Log { .. } => HistoryKind::Log,
        }
    }

    /// One-line label for history lists.
    pub fn summary(&self, max_chars: usize) -> String {
        let source = match &self.entry {
            HistoryEntry::Script { prompt, .. } => prompt.as_str(),
            HistoryEntry::Log {
                focus_term, logs, ..
            } => {
                if focus_term.trim().is_empty() {
                    logs.as_str()
                } else {
                    focus_term.as_str()
                }
            }
        };
        let line = source.lines().next().unwrap_or_default().trim();
        let mut summary: String = line.chars().take(max_chars).collect();
        if line.chars().count() > max_chars {
            summary.push('…');
        }
        summary
    }
}
