use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WorkPilotConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

/// Settings for the OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Extra attempts after the first failure.
    pub retry: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub backoff_base_ms: u64,
    pub temperature: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    pub max_input_chars: usize,
    pub similarity_threshold: f64,
    pub default_quarter: String,
}

impl Default for WorkPilotConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            llm: LlmConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_workpilot_dir()
            .join("workpilot.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            model: "default/deepseek-v3-2".into(),
            timeout_secs: 30,
            retry: 2,
            backoff_base_ms: 1000,
            temperature: 0.0,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 20_000,
            similarity_threshold: crate::similarity::DEFAULT_THRESHOLD,
            default_quarter: "2026第一季度".into(),
        }
    }
}

impl LlmConfig {
    /// Both an endpoint and a key are present.
    pub fn is_configured(&self) -> bool {
        !self.api_url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

/// Returns `~/.workpilot/`, or `./.workpilot/` when no home directory is known.
pub fn default_workpilot_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".workpilot")
}

/// Returns the default config file path: `~/.workpilot/config.toml`
pub fn default_config_path() -> PathBuf {
    default_workpilot_dir().join("config.toml")
}

const DEEPSEEK_DEFAULT_URL: &str = "https://api.deepseek.com";
const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";

impl WorkPilotConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            WorkPilotConfig::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from `lookup` (the process environment in production).
    ///
    /// `LLM_API_URL` + `LLM_API_KEY` win over the `DEEPSEEK_*` variables, which
    /// only fill in an otherwise unconfigured endpoint.
    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(val) = get("WORKPILOT_DB") {
            self.storage.db_path = val;
        }
        if let Some(val) = get("WORKPILOT_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Some(port) = get("WORKPILOT_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        if let Some(val) = get("LLM_API_URL") {
            self.llm.api_url = val;
        }
        if let Some(val) = get("LLM_API_KEY") {
            self.llm.api_key = val;
        }
        if let Some(val) = get("LLM_MODEL") {
            self.llm.model = val;
        }
        if let Some(secs) = get("LLM_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.llm.timeout_secs = secs;
        }
        if let Some(retry) = get("LLM_RETRY").and_then(|v| v.parse().ok()) {
            self.llm.retry = retry;
        }

        if !self.llm.is_configured() {
            if let Some(key) = get("DEEPSEEK_API_KEY") {
                self.llm.api_key = key;
                self.llm.api_url =
                    get("DEEPSEEK_BASE_URL").unwrap_or_else(|| DEEPSEEK_DEFAULT_URL.into());
                self.llm.model =
                    get("DEEPSEEK_MODEL").unwrap_or_else(|| DEEPSEEK_DEFAULT_MODEL.into());
            }
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = WorkPilotConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.llm.retry, 2);
        assert_eq!(config.report.max_input_chars, 20_000);
        assert_eq!(config.report.similarity_threshold, 0.6);
        assert!(config.storage.db_path.ends_with("workpilot.db"));
        assert!(!config.llm.is_configured());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"

[storage]
db_path = "/tmp/test.db"

[llm]
api_url = "http://localhost:8000/v1"
api_key = "sk-test"
retry = 4
"#;
        let config: WorkPilotConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.llm.retry, 4);
        assert!(config.llm.is_configured());
        // defaults still apply for unset fields
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.report.max_input_chars, 20_000);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = WorkPilotConfig::default();
        config.apply_env_overrides(env(&[
            ("WORKPILOT_DB", "/tmp/override.db"),
            ("WORKPILOT_LOG_LEVEL", "trace"),
            ("WORKPILOT_PORT", "8080"),
            ("LLM_API_URL", "http://llm.local"),
            ("LLM_API_KEY", " key "),
            ("LLM_TIMEOUT", "5"),
        ]));

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.server.log_level, "trace");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.api_url, "http://llm.local");
        assert_eq!(config.llm.api_key, "key");
        assert_eq!(config.llm.timeout_secs, 5);
    }

    #[test]
    fn deepseek_fills_unconfigured_endpoint() {
        let mut config = WorkPilotConfig::default();
        config.apply_env_overrides(env(&[("DEEPSEEK_API_KEY", "ds-key")]));
        assert_eq!(config.llm.api_url, DEEPSEEK_DEFAULT_URL);
        assert_eq!(config.llm.model, DEEPSEEK_DEFAULT_MODEL);
        assert!(config.llm.is_configured());
    }

    #[test]
    fn generic_endpoint_wins_over_deepseek() {
        let mut config = WorkPilotConfig::default();
        config.apply_env_overrides(env(&[
            ("LLM_API_URL", "http://llm.local"),
            ("LLM_API_KEY", "key"),
            ("DEEPSEEK_API_KEY", "ds-key"),
        ]));
        assert_eq!(config.llm.api_url, "http://llm.local");
        assert_eq!(config.llm.api_key, "key");
    }

    #[test]
    fn unparseable_numbers_are_ignored() {
        let mut config = WorkPilotConfig::default();
        config.apply_env_overrides(env(&[("WORKPILOT_PORT", "http"), ("LLM_RETRY", "-1")]));
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.llm.retry, 2);
    }
}
