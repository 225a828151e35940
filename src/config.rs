//! Configuration for the engine (`agent`) and the planner service (`agent-brain`)

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG: &str = ".agentic-shell.yml";
const APP_DIR: &str = "agentic-shell";
const USER_CONFIG: &str = "agentic-shell.yml";

/// Top-level configuration shared by both binaries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Execution engine settings
    pub engine: EngineConfig,

    /// Planner service settings
    pub brain: BrainConfig,

    /// Language model settings used by the planner service
    pub llm: LlmConfig,
}

impl Config {
    /// Fail fast when the planner service could not reach its model.
    pub fn validate(&self) -> Result<()> {
        if self.llm.requires_api_key() && self.llm.api_key().is_none() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Loads `config_path` if given, else the first readable candidate, else defaults.
    ///
    /// An explicit path must load. A candidate that fails to parse is skipped
    /// with a warning.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::candidate_paths().iter().filter(|p| p.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!(path = %candidate.display(), error = %e, "load: skipping config"),
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Working-directory file first, then the per-user one.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(APP_DIR).join(USER_CONFIG));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Execution engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Full URL of the planner endpoint
    #[serde(rename = "brain-url")]
    pub brain_url: String,

    /// Upper bound on the wait for a plan, in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Interaction log path; `~/` is expanded
    #[serde(rename = "log-file")]
    pub log_file: String,

    /// Shell used to run non-`cd` steps as `<shell> -c <command>`
    pub shell: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            brain_url: "http://127.0.0.1:8000/get_plan".to_string(),
            timeout_ms: 30_000,
            log_file: "~/agentic-shell/engine/interaction_log.jsonl".to_string(),
            shell: "sh".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn log_path(&self) -> PathBuf {
        expand_home(&self.log_file)
    }
}

/// Planner service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    /// Address the HTTP listener binds to
    pub bind: String,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// "gemini" or "ollama"
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    pub temperature: f32,

    #[serde(rename = "top-p")]
    pub top_p: f32,

    #[serde(rename = "top-k")]
    pub top_k: u32,

    /// Maximum tokens per response
    #[serde(rename = "max-output-tokens")]
    pub max_output_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.2,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: 2048,
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    /// Local providers run without a credential.
    pub fn requires_api_key(&self) -> bool {
        self.provider != "ollama"
    }

    /// Reads the key from the configured environment variable; blank counts as absent.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|key| !key.trim().is_empty())
    }
}

/// Expands a leading `~` or `~/` to the user's home directory.
///
/// `~user` forms are not resolved and come back as literal paths.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.engine.brain_url, "http://127.0.0.1:8000/get_plan");
        assert_eq!(config.engine.timeout_ms, 30_000);
        assert_eq!(config.brain.bind, "127.0.0.1:8000");
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.top_k, 1);
        assert_eq!(config.max_output_tokens, 2048);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
engine:
  brain-url: http://10.0.0.5:9000/get_plan
  timeout-ms: 5000
  log-file: /tmp/agent.jsonl
  shell: bash

brain:
  bind: 0.0.0.0:9000

llm:
  provider: ollama
  model: llama3
  base-url: http://localhost:11434
  max-output-tokens: 512
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.engine.brain_url, "http://10.0.0.5:9000/get_plan");
        assert_eq!(config.engine.shell, "bash");
        assert_eq!(config.engine.log_path(), PathBuf::from("/tmp/agent.jsonl"));
        assert_eq!(config.brain.bind, "0.0.0.0:9000");
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.max_output_tokens, 512);
        assert!(!config.llm.requires_api_key());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gemini-2.5-pro
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.engine.shell, "sh");
    }

    #[test]
    fn test_validate_requires_key() {
        let mut config = Config::default();
        config.llm.api_key_env = "AGENTIC_SHELL_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        assert!(config.validate().is_err());

        config.llm.provider = "ollama".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_candidate_paths_order() {
        let paths = Config::candidate_paths();

        assert_eq!(paths[0], PathBuf::from(".agentic-shell.yml"));
        if let Some(config_dir) = dirs::config_dir() {
            assert_eq!(paths[1], config_dir.join("agentic-shell").join("agentic-shell.yml"));
        }
    }

    #[test]
    fn test_explicit_path_must_load() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yml");
        assert!(Config::load(Some(&missing)).is_err());

        let broken = dir.path().join("broken.yml");
        fs::write(&broken, "engine: [not, a, map]\n").unwrap();
        assert!(Config::load(Some(&broken)).is_err());
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();

        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("~/a/b"), home.join("a/b"));
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("~other"), PathBuf::from("~other"));
    }
}
