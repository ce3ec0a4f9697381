use super::types::ScriptKind;

pub fn script_generation(request: &str, kind: ScriptKind) -> String {
    format!(
        "You are a digital forensics and incident response engineer. Write a {kind} script \
         for the request below. Handle errors defensively, follow {kind} best practices and \
         comment the non-obvious steps. Respond with the raw script only: no Markdown, no \
         prose, no code fences.\n\
         Request: \"{request}\""
    )
}

pub fn script_evaluation(script: &str, kind: ScriptKind) -> String {
    let tag = kind.fence_tag();
    format!(
        "You are a security reviewer auditing a {kind} script. Check it for Command \
         Injection, Hardcoded Secrets, Insecure File Permissions, Insecure Deserialization, \
         Weak Encryption and Sensitive Data Exposure, as well as general best-practice and \
         efficiency problems. Explain every finding and give a concrete recommendation for \
         it. Then return a complete improved version of the script that fixes all of them.\n\
         Script:\n```{tag}\n{script}\n```"
    )
}

pub fn log_analysis(logs: &str, focus_term: Option<&str>) -> String {
    let focus = focus_term
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| {
            format!(
                " Give particular attention to entries related to \"{term}\" and rank \
                 findings involving it first."
            )
        })
        .unwrap_or_default();

    format!(
        "You are a forensic log analyst. Examine the log data below for security incidents, \
         anomalies and indicators of compromise.{focus}\n\n\
         Write a concise Markdown report with these sections:\n\
         - **Executive Summary:** what happened, in brief.\n\
         - **Key Findings:** the most important observations as bullets.\n\
         - **Detected Anomalies/Incidents:** details of each suspicious activity.\n\
         - **Recommendations:** actionable next steps.\n\n\
         Log data:\n```\n{logs}\n```"
    )
}

pub fn remediation(context: &str) -> String {
    format!(
        "You are an incident response and system hardening specialist. Using the context \
         below, produce a short, actionable list of remediation recommendations as a JSON \
         array.\n\
         - When the context describes concrete threats or findings, address those directly.\n\
         - When it is general, focus on practical hardening and privacy measures.\n\n\
         Context:\n```\n{context}\n```"
    )
}

pub fn prompt_suggestions(partial: &str) -> String {
    format!(
        "You help analysts phrase requests for forensic scripts (PowerShell or Bash). Offer \
         3 short, relevant completions of the partial request below, as a JSON array of \
         strings.\n\
         Partial request: \"{}\"",
        partial.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_prompt_embeds_request_and_kind() {
        let prompt = script_generation("list running processes", ScriptKind::PowerShell);
        assert!(prompt.contains("\"list running processes\""));
        assert!(prompt.contains("PowerShell script"));
        assert!(prompt.contains("raw script only"));
    }

    #[test]
    fn evaluation_prompt_fences_script_with_kind_tag() {
        let prompt = script_evaluation("ls -la", ScriptKind::Bash);
        assert!(prompt.contains("```bash\nls -la\n```"));
    }

    #[test]
    fn focus_term_is_appended_when_present() {
        let prompt = log_analysis("line", Some("  sshd  "));
        assert!(prompt.contains("\"sshd\""));
        assert!(prompt.contains("rank findings involving it first"));
    }

    #[test]
    fn blank_focus_term_is_ignored() {
        let with_blank = log_analysis("line", Some("   "));
        let without = log_analysis("line", None);
        assert_eq!(with_blank, without);
        assert!(!without.contains("particular attention"));
    }

    #[test]
    fn suggestion_prompt_trims_partial() {
        let prompt = prompt_suggestions("  collect browser history  ");
        assert!(prompt.contains("\"collect browser history\""));
    }
}
