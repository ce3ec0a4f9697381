use super::types::Command;
use crate::gateway::ScriptKind;
use crate::session::View;
use std::path::PathBuf;

/// Parse one line of shell input. Lines without a leading `/` are free text.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    let Some(body) = trimmed.strip_prefix('/') else {
        return Ok(Command::Text(line.to_string()));
    };

    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "view" => Command::View(
            rest.parse::<View>()
                .map_err(|_| "Usage: /view <script|logs|remediation>".to_string())?,
        ),
        "kind" => Command::Kind(
            rest.parse::<ScriptKind>()
                .map_err(|_| "Usage: /kind <powershell|bash>".to_string())?,
        ),
        "prompt" => Command::Prompt(rest.to_string()),
        "generate" => Command::Generate,
        "evaluate" => Command::Evaluate,
        "suggestions" => Command::Suggestions,
        "pick" => Command::Pick(parse_index(rest, "/pick <n>")?),
        "logs" => {
            if rest.is_empty() {
                return Err("Usage: /logs <file>".into());
            }
            Command::Logs(PathBuf::from(rest))
        }
        "focus" => Command::Focus(rest.to_string()),
        "analyze" => Command::Analyze,
        "plan" => Command::Plan,
        "history" => Command::History,
        "restore" => Command::Restore(parse_index(rest, "/restore <n>")?),
        "clear-history" => Command::ClearHistory,
        "key" => Command::Key,
        "forget-key" => Command::ForgetKey,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command: /{other}. Type /help for a list.")),
    };
    Ok(command)
}

fn parse_index(raw: &str, usage: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(format!("Usage: {usage} (n starts at 1)")),
    }
}
