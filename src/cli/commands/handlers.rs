use super::types::{Command, CommandResult};
use crate::app::{App, acquire_credential};
use crate::gateway::ScriptKind;
use crate::session::View;
use crate::ui::{render, style};
use crate::workflows::{Outcome, Precondition};
use std::path::Path;

pub async fn handle_command(app: &App, command: Command) -> CommandResult {
    match command {
        Command::View(view) => handle_view(app, view),
        Command::Kind(kind) => handle_kind(app, kind),
        Command::Prompt(text) => handle_prompt(app, &text),
        Command::Generate => handle_generate(app).await,
        Command::Evaluate => handle_evaluate(app).await,
        Command::Suggestions => handle_suggestions(app),
        Command::Pick(index) => handle_pick(app, index),
        Command::Logs(path) => handle_logs(app, &path).await,
        Command::Focus(term) => handle_focus(app, &term),
        Command::Analyze => handle_analyze(app).await,
        Command::Plan => handle_plan(app).await,
        Command::History => handle_history(app),
        Command::Restore(index) => handle_restore(app, index),
        Command::ClearHistory => {
            app.store.clear_history();
            CommandResult::visible(style::success("History cleared."))
        }
        Command::Key => handle_key(app).await,
        Command::ForgetKey => {
            app.store.set_credential(None);
            app.store.request_credential_prompt();
            CommandResult::visible(style::warning(
                "API key removed. Use /key to enter a new one.",
            ))
        }
        Command::Help => CommandResult::visible(help_text()),
        Command::Quit => CommandResult::exit(),
        Command::Text(text) => handle_text(app, &text),
    }
}

fn outcome_text(outcome: &Outcome, completed: impl FnOnce() -> String) -> String {
    match outcome {
        Outcome::Completed => completed(),
        Outcome::Blocked(Precondition::MissingCredential) => {
            style::warning("No API key is set. Use /key to enter one.")
        }
        Outcome::Blocked(reason) => style::warning(format!("Nothing to do: {reason}.")),
        Outcome::Failed(message) => style::error(message),
    }
}

fn handle_view(app: &App, view: View) -> CommandResult {
    app.set_view(view);
    let mut text = style::header(format!("Switched to the {view} view."));
    match view {
        View::Script => {
            let script = app.store.script();
            if !script.generated_script.is_empty() {
                text.push('\n');
                text.push_str(&render::code_block(&script.generated_script, script.kind));
            }
        }
        View::Logs => {
            let slice = app.store.logs();
            if !slice.analysis.is_empty() {
                text.push('\n');
                text.push_str(&render::markdown(&slice.analysis));
            }
        }
        View::Remediation => {
            if app.is_reactive() {
                text.push('\n');
                text.push_str(&style::dim("Building a plan. Use /plan to show it."));
            }
        }
    }
    CommandResult::visible(text)
}

fn handle_kind(app: &App, kind: ScriptKind) -> CommandResult {
    app.script.set_script_kind(kind);
    CommandResult::visible(format!("Script kind: {}", style::value(kind)))
}

fn handle_prompt(app: &App, text: &str) -> CommandResult {
    match app.script.update_prompt(text) {
        Some(error) => CommandResult::visible(style::warning(error)),
        None => CommandResult::visible(style::dim("Prompt updated.")),
    }
}

async fn handle_generate(app: &App) -> CommandResult {
    let outcome = app.script.generate().await;
    CommandResult::visible(outcome_text(&outcome, || {
        let script = app.store.script();
        format!(
            "{}\n{}",
            render::code_block(&script.generated_script, script.kind),
            style::dim("Use /evaluate for a security review.")
        )
    }))
}

async fn handle_evaluate(app: &App) -> CommandResult {
    let outcome = app.script.evaluate().await;
    CommandResult::visible(outcome_text(&outcome, || {
        let script = app.store.script();
        script
            .evaluation
            .map(|evaluation| render::evaluation_report(&evaluation, script.kind))
            .unwrap_or_default()
    }))
}

fn handle_suggestions(app: &App) -> CommandResult {
    if app.script.is_suggesting() {
        return CommandResult::visible(style::dim("Fetching suggestions..."));
    }
    CommandResult::visible(render::suggestions(&app.script.suggestions()))
}

fn handle_pick(app: &App, index: usize) -> CommandResult {
    match index
        .checked_sub(1)
        .and_then(|index| app.script.select_suggestion(index))
    {
        Some(prompt) => CommandResult::visible(format!("Prompt: {}", style::value(prompt))),
        None => CommandResult::visible(style::warning(format!("No suggestion #{index}."))),
    }
}

async fn handle_logs(app: &App, path: &Path) -> CommandResult {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::visible(style::error(format!(
                "Could not read {}: {error}",
                path.display()
            )));
        }
    };
    match app.logs.update_logs(&raw) {
        Some(error) => CommandResult::visible(style::warning(error)),
        None => CommandResult::visible(format!(
            "Loaded {} characters from {}.",
            app.store.logs().logs.chars().count(),
            style::value(path.display())
        )),
    }
}

fn handle_focus(app: &App, term: &str) -> CommandResult {
    app.logs.set_focus_term(term);
    if term.trim().is_empty() {
        CommandResult::visible(style::dim("Focus keyword cleared."))
    } else {
        CommandResult::visible(format!("Focus keyword: {}", style::value(term.trim())))
    }
}

async fn handle_analyze(app: &App) -> CommandResult {
    let outcome = app.logs.analyze().await;
    CommandResult::visible(outcome_text(&outcome, || {
        render::markdown(&app.store.logs().analysis)
    }))
}

async fn handle_plan(app: &App) -> CommandResult {
    if app.remediation.is_loading() {
        return CommandResult::visible(style::dim(
            "The plan is still being generated. Try /plan again in a moment.",
        ));
    }
    if let Some(message) = app.remediation.last_error() {
        app.remediation.dismiss_error();
        return CommandResult::visible(style::error(message));
    }

    let plan = app.store.remediation_plan();
    let outcome = if plan.is_empty() {
        app.remediation.refresh().await
    } else {
        Outcome::Completed
    };
    CommandResult::visible(outcome_text(&outcome, || {
        render::remediation_plan(
            &app.store.remediation_plan(),
            app.remediation.has_context(),
            app.store.script().kind,
        )
    }))
}

fn handle_history(app: &App) -> CommandResult {
    app.store.set_history_panel_open(true);
    CommandResult::visible(render::history_list(&app.store.history()))
}

fn handle_restore(app: &App, index: usize) -> CommandResult {
    let item = index
        .checked_sub(1)
        .and_then(|index| app.store.history().into_iter().nth(index));
    let Some(item) = item else {
        return CommandResult::visible(style::warning(format!("No history item #{index}.")));
    };
    app.store.load_from_history(&item);
    app.sync_reactive_remediation();
    CommandResult::visible(format!(
        "{} {}",
        style::success(format!("Restored {}.", item.kind())),
        style::dim(format!("Now in the {} view.", app.store.active_view()))
    ))
}

async fn handle_key(app: &App) -> CommandResult {
    match acquire_credential(&app.store).await {
        Ok(()) => {
            let masked = app
                .store
                .credential()
                .map(|credential| credential.masked())
                .unwrap_or_default();
            CommandResult::visible(format!("API key set: {}", style::value(masked)))
        }
        Err(error) => CommandResult::visible(style::error(error)),
    }
}

/// Free text edits whichever tool is on screen.
fn handle_text(app: &App, text: &str) -> CommandResult {
    match app.store.active_view() {
        View::Script => handle_prompt(app, text.trim()),
        View::Logs => {
            let mut logs = app.store.logs().logs;
            if !logs.is_empty() {
                logs.push('\n');
            }
            logs.push_str(text);
            match app.logs.update_logs(&logs) {
                Some(error) => CommandResult::visible(style::warning(error)),
                None => CommandResult::visible(String::new()),
            }
        }
        View::Remediation => CommandResult::visible(style::dim(
            "The remediation view takes no input. Use /plan or /help.",
        )),
    }
}

fn help_text() -> String {
    format!(
        "{}\n\
         /view <script|logs|remediation>  Switch tool\n\
         /kind <powershell|bash>          Set the script language\n\
         /prompt <text>                   Describe the script to generate\n\
         /generate                        Generate the script\n\
         /evaluate                        Security review of the generated script\n\
         /suggestions                     Show prompt suggestions\n\
         /pick <n>                        Use suggestion n as the prompt\n\
         /logs <file>                     Load log data from a file\n\
         /focus <term>                    Keyword to prioritize during analysis\n\
         /analyze                         Analyze the loaded logs\n\
         /plan                            Show the remediation plan\n\
         /history                         List saved items\n\
         /restore <n>                     Restore history item n\n\
         /clear-history                   Delete all saved items\n\
         /key, /forget-key                Set or remove the API key\n\
         /help, /quit\n\
         {}",
        style::header("Commands"),
        style::dim("Plain text edits the prompt (script view) or appends to the logs (logs view).")
    )
}
