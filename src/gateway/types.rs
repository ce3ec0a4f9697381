use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Scripting language requested from the model.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ScriptKind {
    #[default]
    PowerShell,
    Bash,
}

impl ScriptKind {
    /// Operating environment the script kind targets.
    pub fn environment(self) -> &'static str {
        match self {
            Self::PowerShell => "Windows",
            Self::Bash => "Linux",
        }
    }

    /// Fence tag used when embedding a script in a prompt.
    pub fn fence_tag(self) -> &'static str {
        match self {
            Self::PowerShell => "powershell",
            Self::Bash => "bash",
        }
    }
}

// ── Script evaluation ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum VulnerabilityCategory {
    #[serde(rename = "Command Injection")]
    #[strum(serialize = "Command Injection")]
    CommandInjection,
    #[serde(rename = "Hardcoded Secret")]
    #[strum(serialize = "Hardcoded Secret")]
    HardcodedSecret,
    #[serde(rename = "Insecure Permissions")]
    #[strum(serialize = "Insecure Permissions")]
    InsecurePermissions,
    #[serde(rename = "Insecure Deserialization")]
    #[strum(serialize = "Insecure Deserialization")]
    InsecureDeserialization,
    #[serde(rename = "Weak Encryption")]
    #[strum(serialize = "Weak Encryption")]
    WeakEncryption,
    #[serde(rename = "Sensitive Data Exposure")]
    #[strum(serialize = "Sensitive Data Exposure")]
    SensitiveDataExposure,
    #[serde(rename = "Best Practice")]
    #[strum(serialize = "Best Practice")]
    BestPractice,
    /// Anything the model labels outside the known set.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Informational,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    #[serde(rename = "vulnerabilityType")]
    pub category: VulnerabilityCategory,
    pub risk_level: RiskLevel,
    /// Free text: models return ranges ("12-14") and labels as well as numbers.
    pub line_number: String,
    pub explanation: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub vulnerabilities: Vec<Vulnerability>,
    pub improved_script: String,
}

impl EvaluationResult {
    pub fn highest_risk(&self) -> Option<RiskLevel> {
        self.vulnerabilities
            .iter()
            .map(|v| v.risk_level)
            .min_by_key(|level| *level as u8)
    }
}

// ── Remediation ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum RemediationCategory {
    #[serde(rename = "System Hardening")]
    #[strum(serialize = "System Hardening")]
    SystemHardening,
    Privacy,
    #[serde(rename = "Incident Response")]
    #[strum(serialize = "Incident Response")]
    IncidentResponse,
    #[serde(rename = "Network Security")]
    #[strum(serialize = "Network Security")]
    NetworkSecurity,
    #[serde(other)]
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationRecommendation {
    pub title: String,
    pub category: RemediationCategory,
    pub details: Vec<String>,
    pub priority: Priority,
}
