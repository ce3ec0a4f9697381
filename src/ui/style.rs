use crate::gateway::{Priority, RiskLevel};
use console::{Style, style};
use std::fmt::Display;

/// Green bold: completed operations, confirmations
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// White bold: view titles, section headers
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim: hints, timestamps, secondary text
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow: warnings, validation errors
pub fn warning<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Red bold: the dismissible error banner
pub fn error<D: Display>(text: D) -> String {
    style(text).red().bold().to_string()
}

/// Cyan bold: list indices, bullets
pub fn accent<D: Display>(text: D) -> String {
    style(text).cyan().bold().to_string()
}

/// Green: confirmed values such as the masked key or file paths
pub fn value<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

fn risk_style(level: RiskLevel) -> Style {
    match level {
        RiskLevel::High => Style::new().red().bold(),
        RiskLevel::Medium => Style::new().yellow().bold(),
        RiskLevel::Low => Style::new().cyan(),
        RiskLevel::Informational => Style::new().dim(),
    }
}

/// `[High]`-style tag coloured by severity.
pub fn risk_tag(level: RiskLevel) -> String {
    risk_style(level).apply_to(format!("[{level}]")).to_string()
}

pub fn priority_tag(priority: Priority) -> String {
    let style = match priority {
        Priority::High => Style::new().red().bold(),
        Priority::Medium => Style::new().yellow(),
        Priority::Low => Style::new().cyan(),
    };
    style.apply_to(format!("{priority} Priority")).to_string()
}
