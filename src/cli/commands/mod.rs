use crate::gateway::ScriptKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod handlers;
pub mod parser;
pub mod types;

pub use handlers::handle_command;
pub use parser::parse_command;
pub use types::{Command, CommandResult};

/// `forensight` - AI-assisted forensic scripting, log triage and remediation.
#[derive(Parser, Debug)]
#[command(name = "forensight")]
#[command(author = "theonlyhennygod")]
#[command(version = "0.1.0")]
#[command(about = "AI-assisted forensic scripting, log triage and remediation planning.", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Keep history in memory only for this run
    #[arg(long, global = true)]
    pub no_history: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive session (default)
    Shell,

    /// Generate a forensic script from a description
    Generate {
        /// What the script should collect or check
        prompt: String,

        /// Script language (powershell, bash)
        #[arg(short, long, default_value = "powershell", value_parser = parse_script_kind)]
        kind: ScriptKind,

        /// Also run a security evaluation of the generated script
        #[arg(long)]
        evaluate: bool,
    },

    /// Analyze a log file for incidents and anomalies
    Analyze {
        /// Log file to read
        file: PathBuf,

        /// Keyword to prioritize in the findings
        #[arg(short, long)]
        focus: Option<String>,
    },

    /// Print a remediation and hardening plan
    Remediate,

    /// Inspect or clear the local history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List saved items, newest first
    List,
    /// Delete all saved items
    Clear,
}

fn parse_script_kind(value: &str) -> Result<ScriptKind, String> {
    value
        .parse()
        .map_err(|_| format!("unknown script kind `{value}` (expected powershell or bash)"))
}
