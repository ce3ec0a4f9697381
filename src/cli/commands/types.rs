use crate::gateway::ScriptKind;
use crate::session::View;
use std::path::PathBuf;

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    View(View),
    Kind(ScriptKind),
    Prompt(String),
    Generate,
    Evaluate,
    Suggestions,
    /// 1-based index into the current suggestions
    Pick(usize),
    Logs(PathBuf),
    Focus(String),
    Analyze,
    Plan,
    History,
    /// 1-based index into the history list
    Restore(usize),
    ClearHistory,
    Key,
    ForgetKey,
    Help,
    Quit,
    /// Input without a leading slash, routed by the active view.
    Text(String),
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub text: String,
    pub exit: bool,
}

impl CommandResult {
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit: false,
        }
    }

    pub fn exit() -> Self {
        Self {
            text: String::new(),
            exit: true,
        }
    }
}
