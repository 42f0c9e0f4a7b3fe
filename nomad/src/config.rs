//! Nomad configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main Nomad configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Completion provider configuration
    pub llm: LlmConfig,

    /// Query strategist stage settings
    #[serde(default = "StageConfig::strategist")]
    pub strategist: StageConfig,

    /// Itinerary planner stage settings
    #[serde(default = "StageConfig::planner")]
    pub planner: StageConfig,

    /// Web search configuration
    pub search: SearchConfig,

    /// Where saved itineraries go
    pub output: OutputConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            llm: LlmConfig::default(),
            strategist: StageConfig::strategist(),
            planner: StageConfig::planner(),
            search: SearchConfig::default(),
            output: OutputConfig::default(),
            prompts: PromptsConfig::default(),
        }
    }
}

impl Config {
    /// Parse a YAML document, filling unspecified fields with defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config file")
    }

    /// Validate configuration before use
    ///
    /// Checks provider names and numeric ranges. Call this early in startup to
    /// fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.llm.provider.as_str(), "groq" | "openai") {
            return Err(eyre::eyre!(
                "Unknown LLM provider '{}'. Supported: groq, openai",
                self.llm.provider
            ));
        }
        if !matches!(self.search.provider.as_str(), "duckduckgo" | "tavily" | "brave") {
            return Err(eyre::eyre!(
                "Unknown search provider '{}'. Supported: duckduckgo, tavily, brave",
                self.search.provider
            ));
        }
        if self.search.provider != "duckduckgo" && self.search.api_key_env.is_empty() {
            return Err(eyre::eyre!(
                "search.api-key-env must be set for the {} provider",
                self.search.provider
            ));
        }
        if self.search.max_results == 0 {
            return Err(eyre::eyre!("search.max-results must be at least 1"));
        }
        for (name, stage) in [("strategist", &self.strategist), ("planner", &self.planner)] {
            if !(0.0..=2.0).contains(&stage.temperature) {
                return Err(eyre::eyre!(
                    "{}.temperature must be between 0.0 and 2.0 (got {})",
                    name,
                    stage.temperature
                ));
            }
            if stage.max_tokens == 0 {
                return Err(eyre::eyre!("{}.max-tokens must be at least 1", name));
            }
        }
        Ok(())
    }

    /// Resolve the completion API key
    ///
    /// An explicitly supplied key wins over the environment variable named by
    /// `llm.api-key-env`. Blank values count as missing.
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> Option<String> {
        debug!(explicit = explicit.is_some(), env = %self.llm.api_key_env, "resolve_api_key: called");
        explicit
            .map(str::to_string)
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.llm.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .nomad.yml
        let local_config = PathBuf::from(".nomad.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/nomad/nomad.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("nomad").join("nomad.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".nomad.yml")];
                if let Some(dir) = dirs::config_dir() {
                    paths.push(dir.join("nomad").join("nomad.yml"));
                }
                paths
            }
        };

        candidates
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config = Self::from_yaml(&content)?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("groq" or "openai")
    pub provider: String,

    /// Default model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Hard cap on tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            base_url: "https://api.groq.com/openai".to_string(),
            max_tokens: 8192,
            timeout_ms: 120_000,
        }
    }
}

/// Model used by both stages unless configured otherwise
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Sampling settings for one pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Model identifier for this stage
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Max output tokens
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl StageConfig {
    /// Short, focused call producing one search query
    pub fn strategist() -> Self {
        Self {
            model: default_model(),
            temperature: 0.7,
            max_tokens: 100,
        }
    }

    /// Long, creative call producing the whole itinerary
    pub fn planner() -> Self {
        Self {
            model: default_model(),
            temperature: 0.8,
            max_tokens: 4000,
        }
    }
}

/// Web search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Backend: "duckduckgo", "tavily" or "brave"
    pub provider: String,

    /// Environment variable holding the search API key (unused by duckduckgo)
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Maximum results requested from the backend
    #[serde(rename = "max-results")]
    pub max_results: usize,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: "duckduckgo".to_string(),
            api_key_env: String::new(),
            max_results: 4,
            timeout_ms: 30_000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory itineraries are saved into
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory searched for `{name}.pmt` overrides
    pub dir: PathBuf,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".nomad/prompts"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.search.provider, "duckduckgo");
        assert_eq!(config.search.max_results, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stage_defaults() {
        let config = Config::default();

        assert_eq!(config.strategist.temperature, 0.7);
        assert_eq!(config.strategist.max_tokens, 100);
        assert_eq!(config.planner.temperature, 0.8);
        assert_eq!(config.planner.max_tokens, 4000);
        assert_eq!(config.planner.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.base_url, "https://api.groq.com/openai");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: DEBUG
llm:
  provider: openai
  model: gpt-4o-mini
  api-key-env: MY_API_KEY
  base-url: https://api.openai.com
  max-tokens: 2048
  timeout-ms: 60000

planner:
  temperature: 0.5
  max-tokens: 3000

search:
  provider: tavily
  api-key-env: TAVILY_API_KEY
  max-results: 3

output:
  dir: /tmp/trips
"#;

        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.planner.temperature, 0.5);
        assert_eq!(config.planner.max_tokens, 3000);
        assert_eq!(config.planner.model, "llama-3.1-8b-instant");
        assert_eq!(config.search.provider, "tavily");
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.output.dir, PathBuf::from("/tmp/trips"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_yaml("llm:\n  model: llama-3.3-70b-versatile\n").unwrap();

        // Specified value
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");

        // Defaults for unspecified
        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.strategist, StageConfig::strategist());
        assert_eq!(config.planner, StageConfig::planner());
        assert_eq!(config.search.timeout_ms, 30_000);
    }

    #[test]
    fn test_validate_rejects_unknown_search_provider() {
        let mut config = Config::default();
        config.search.provider = "bing".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Unknown search provider"));
    }

    #[test]
    fn test_validate_requires_search_key_env() {
        let mut config = Config::default();
        config.search.provider = "brave".to_string();
        assert!(config.validate().is_err());

        config.search.api_key_env = "BRAVE_API_KEY".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = Config::default();
        config.planner.temperature = 3.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("planner.temperature"));
    }

    #[test]
    #[serial]
    fn test_resolve_api_key_prefers_explicit() {
        let mut config = Config::default();
        config.llm.api_key_env = "NOMAD_TEST_KEY_EXPLICIT".to_string();
        unsafe { std::env::set_var("NOMAD_TEST_KEY_EXPLICIT", "from-env") };

        assert_eq!(config.resolve_api_key(Some("from-input")).as_deref(), Some("from-input"));
        assert_eq!(config.resolve_api_key(Some("   ")).as_deref(), Some("from-env"));
        assert_eq!(config.resolve_api_key(None).as_deref(), Some("from-env"));

        unsafe { std::env::remove_var("NOMAD_TEST_KEY_EXPLICIT") };
    }

    #[test]
    #[serial]
    fn test_resolve_api_key_missing() {
        let mut config = Config::default();
        config.llm.api_key_env = "NOMAD_TEST_KEY_MISSING".to_string();
        unsafe { std::env::remove_var("NOMAD_TEST_KEY_MISSING") };

        assert!(config.resolve_api_key(None).is_none());
        assert!(config.resolve_api_key(Some("")).is_none());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nomad.yml");
        fs::write(&path, "log-level: WARN\nsearch:\n  max-results: 2\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.search.max_results, 2);
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("WARN"));
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let path = PathBuf::from("/nonexistent/nomad.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
