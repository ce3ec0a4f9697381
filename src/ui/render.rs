//! Plain-text rendering of session state for the terminal.

use super::style;
use crate::gateway::{EvaluationResult, RemediationRecommendation, ScriptKind};
use crate::session::HistoryItem;
use std::fmt::Write;

const HISTORY_SUMMARY_CHARS: usize = 60;

/// Light Markdown styling: headings and bullets only, everything else as-is.
pub fn markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(heading) = trimmed.strip_prefix('#') {
            let _ = writeln!(out, "{}", style::header(heading.trim_start_matches('#').trim()));
        } else if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            let indent = &line[..line.len() - trimmed.len()];
            let _ = writeln!(out, "{indent}{} {item}", style::accent("•"));
        } else {
            let _ = writeln!(out, "{line}");
        }
    }
    out
}

pub fn code_block(script: &str, kind: ScriptKind) -> String {
    let rule = style::dim(format!("── {kind} {}", "─".repeat(40)));
    format!("{rule}\n{}\n{}", script.trim_end(), style::dim("─".repeat(44)))
}

pub fn evaluation_report(evaluation: &EvaluationResult, kind: ScriptKind) -> String {
    let mut out = String::new();
    if let Some(level) = evaluation.highest_risk() {
        let _ = writeln!(
            out,
            "{} {} {}\n",
            style::value("Highest risk:"),
            style::risk_tag(level),
            style::dim(format!("({} findings)", evaluation.vulnerabilities.len())),
        );
    }
    if evaluation.vulnerabilities.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            style::success(
                "No specific security vulnerabilities were found. The improved script below may \
                 still contain best-practice enhancements."
            )
        );
    }
    for (index, finding) in evaluation.vulnerabilities.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} {} {} {}",
            style::accent(format!("{}.", index + 1)),
            style::risk_tag(finding.risk_level),
            style::header(finding.category),
            style::dim(format!("(line {})", finding.line_number)),
        );
        let _ = writeln!(out, "   {}", finding.explanation);
        let _ = writeln!(out, "   {} {}", style::value("Recommendation:"), finding.recommendation);
    }
    let _ = writeln!(out, "\n{}", style::header("Improved script"));
    out.push_str(&code_block(&evaluation.improved_script, kind));
    out
}

pub fn remediation_plan(
    plan: &[RemediationRecommendation],
    has_context: bool,
    kind: ScriptKind,
) -> String {
    let mut out = String::new();
    let banner = if has_context {
        "Plan generated from the output of the other tools.".to_string()
    } else {
        format!(
            "General hardening and privacy plan for a {} environment. Generate a script or \
             analyze logs for more specific advice.",
            kind.environment()
        )
    };
    let _ = writeln!(out, "{}", style::dim(banner));

    for recommendation in plan {
        let _ = writeln!(
            out,
            "\n{} {} {}",
            style::header(&recommendation.title),
            style::priority_tag(recommendation.priority),
            style::dim(format!("· {}", recommendation.category)),
        );
        for detail in &recommendation.details {
            let _ = writeln!(out, "  {} {detail}", style::accent("✓"));
        }
    }
    out
}

pub fn history_list(items: &[HistoryItem]) -> String {
    if items.is_empty() {
        return style::dim("No history yet. Generate a script or analyze logs to get started.");
    }
    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} {} {}\n    {}",
            style::accent(format!("{:>2}.", index + 1)),
            style::header(item.kind()),
            style::dim(item.timestamp.format("%Y-%m-%d %H:%M:%S UTC")),
            item.summary(HISTORY_SUMMARY_CHARS),
        );
    }
    out
}

pub fn suggestions(items: &[String]) -> String {
    if items.is_empty() {
        return style::dim("No suggestions yet.");
    }
    items
        .iter()
        .enumerate()
        .map(|(index, text)| format!("{} {text}", style::accent(format!("[{}]", index + 1))))
        .collect::<Vec<_>>()
        .join("\n")
}
