use super::App;
use crate::cli::commands::{handle_command, parse_command};
use crate::ui::style;
use anyhow::Result;
use std::io::{IsTerminal, Write};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Interactive loop over stdin lines until `/quit` or end of input.
pub async fn run(app: &App) -> Result<()> {
    let interactive = std::io::stdin().is_terminal();

    println!(
        "{} {}",
        style::header("forensight"),
        style::dim("AI-assisted forensic scripting, log triage and remediation. Type /help.")
    );

    if !app.store.has_credential() {
        if interactive {
            if let Err(error) = app.ensure_credential().await {
                warn!("credential prompt failed: {error:#}");
                println!("{}", style::warning("No API key set. Use /key to enter one."));
            }
        } else {
            println!("{}", style::warning("No API key set. Requests will be refused."));
        }
    }

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        if interactive {
            print!("{} ", style::accent(format!("{}>", app.store.active_view())));
            let _ = std::io::stdout().flush();
        }

        let Some(line) = lines.next_line().await? else {
            debug!("stdin closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", style::warning(message));
                continue;
            }
        };

        let result = handle_command(app, command).await;
        if !result.text.is_empty() {
            println!("{}", result.text);
        }
        if result.exit {
            break;
        }
    }
    Ok(())
}
