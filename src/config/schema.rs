use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

// ── Top-level config ──────────────────────────────────────────────

/// Persistent settings. The credential is deliberately absent: it lives only
/// in session-scoped storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (history file lives here) - computed, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub suggestions: SuggestionConfig,

    #[serde(default)]
    pub remediation: RemediationConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

// ── Provider ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API root, without the `/v1beta` segment
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name, with or without the `models/` prefix
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Whole-request timeout, seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

// ── Prompt suggestions ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Quiet period after the last prompt edit before fetching
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Prompts shorter than this never trigger a fetch
    #[serde(default = "default_min_prompt_chars")]
    pub min_prompt_chars: usize,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    1_500
}

fn default_min_prompt_chars() -> usize {
    10
}

fn default_max_suggestions() -> usize {
    3
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
            min_prompt_chars: default_min_prompt_chars(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

// ── Remediation ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationConfig {
    /// Rebuild the plan whenever upstream context changes
    #[serde(default = "default_true")]
    pub auto_refresh: bool,
    /// Raw-log excerpt size used when no analysis report exists
    #[serde(default = "default_raw_log_excerpt_chars")]
    pub raw_log_excerpt_chars: usize,
}

fn default_raw_log_excerpt_chars() -> usize {
    1_000
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            raw_log_excerpt_chars: default_raw_log_excerpt_chars(),
        }
    }
}

// ── History ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// File name under the data directory
    #[serde(default = "default_history_file")]
    pub file_name: String,
}

fn default_history_file() -> String {
    "history.json".into()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file_name: default_history_file(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let forensight_dir = home.join(".forensight");

        Self {
            data_dir: forensight_dir.clone(),
            config_path: forensight_dir.join("config.toml"),
            provider: ProviderConfig::default(),
            suggestions: SuggestionConfig::default(),
            remediation: RemediationConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history.file_name)
    }

    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let forensight_dir = home.join(".forensight");
        let config_path = forensight_dir.join("config.toml");

        if !forensight_dir.exists() {
            fs::create_dir_all(&forensight_dir)
                .context("Failed to create .forensight directory")?;
        }

        let mut config = if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path.clone_from(&config_path);
            config.data_dir.clone_from(&forensight_dir);
            config
        } else {
            let config = Self {
                config_path: config_path.clone(),
                data_dir: forensight_dir.clone(),
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        if let Ok(model) = std::env::var("FORENSIGHT_MODEL")
            && !model.is_empty()
        {
            self.provider.model = model;
        }

        if let Ok(base_url) = std::env::var("FORENSIGHT_BASE_URL")
            && !base_url.is_empty()
        {
            self.provider.base_url = base_url;
        }

        if let Ok(temp_str) = std::env::var("FORENSIGHT_TEMPERATURE")
            && let Ok(temp) = temp_str.parse::<f64>()
            && (0.0..=2.0).contains(&temp)
        {
            self.provider.temperature = temp;
        }

        if let Ok(data_dir) = std::env::var("FORENSIGHT_DATA_DIR")
            && !data_dir.is_empty()
        {
            self.data_dir = PathBuf::from(data_dir);
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        url::Url::parse(&self.provider.base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "provider.base_url `{}` is not a valid URL: {e}",
                self.provider.base_url
            ))
        })?;
        if self.provider.model.trim().is_empty() {
            return Err(ConfigError::Invalid("provider.model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::Invalid(
                "provider.temperature must be in [0.0, 2.0]".into(),
            ));
        }
        if self.provider.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "provider.request_timeout_secs must be >= 1".into(),
            ));
        }
        if self.suggestions.max_suggestions == 0 {
            return Err(ConfigError::Invalid(
                "suggestions.max_suggestions must be >= 1".into(),
            ));
        }
        if self.history.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "history.file_name must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
