use super::App;
use crate::cli::commands::{Cli, Commands, HistoryCommands};
use crate::config::Config;
use crate::gateway::ScriptKind;
use crate::ui::{render, style};
use crate::workflows::{Outcome, Precondition};
use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;

/// Route a parsed command line. The interactive shell is the default.
pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let app = App::from_config(config, !cli.no_history);
    info!(
        base_url = %app.config.provider.base_url,
        model = %app.config.provider.model,
        persist_history = !cli.no_history,
        "forensight ready"
    );

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => super::shell::run(&app).await,
        Commands::Generate {
            prompt,
            kind,
            evaluate,
        } => run_generate(&app, &prompt, kind, evaluate).await,
        Commands::Analyze { file, focus } => run_analyze(&app, &file, focus.as_deref()).await,
        Commands::Remediate => run_remediate(&app).await,
        Commands::History { command } => {
            match command {
                HistoryCommands::List => println!("{}", render::history_list(&app.store.history())),
                HistoryCommands::Clear => {
                    app.store.clear_history();
                    println!("{}", style::success("History cleared."));
                }
            }
            Ok(())
        }
    }
}

fn require_completed(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Completed => Ok(()),
        Outcome::Blocked(Precondition::MissingCredential) => bail!("No API key available"),
        Outcome::Blocked(reason) => bail!("Nothing to do: {reason}"),
        Outcome::Failed(message) => bail!(message),
    }
}

async fn run_generate(app: &App, prompt: &str, kind: ScriptKind, evaluate: bool) -> Result<()> {
    app.ensure_credential().await?;

    app.script.set_script_kind(kind);
    if let Some(error) = app.script.update_prompt(prompt) {
        eprintln!("{}", style::warning(error));
    }
    require_completed(app.script.generate().await)?;

    let script = app.store.script();
    println!("{}", render::code_block(&script.generated_script, script.kind));

    if evaluate {
        require_completed(app.script.evaluate().await)?;
        if let Some(evaluation) = app.store.script().evaluation {
            println!("{}", render::evaluation_report(&evaluation, kind));
        }
    }
    Ok(())
}

async fn run_analyze(app: &App, file: &Path, focus: Option<&str>) -> Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read log file {}", file.display()))?;

    app.ensure_credential().await?;

    if let Some(error) = app.logs.update_logs(&raw) {
        eprintln!("{}", style::warning(error));
    }
    if let Some(term) = focus {
        app.logs.set_focus_term(term);
    }
    require_completed(app.logs.analyze().await)?;

    println!("{}", render::markdown(&app.store.logs().analysis));
    Ok(())
}

async fn run_remediate(app: &App) -> Result<()> {
    app.ensure_credential().await?;
    require_completed(app.remediation.refresh().await)?;
    println!(
        "{}",
        render::remediation_plan(
            &app.store.remediation_plan(),
            app.remediation.has_context(),
            app.store.script().kind,
        )
    );
    Ok(())
}
