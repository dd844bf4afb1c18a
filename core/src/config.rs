use crate::errors::{TutorError, TutorResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_CONFIG_FILE: &str = "tutor.toml";

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_BIND_ADDR: &str = "TUTOR_BIND_ADDR";
pub const ENV_QUESTION_BANK: &str = "TUTOR_QUESTION_BANK";
pub const ENV_STATIC_DIR: &str = "TUTOR_STATIC_DIR";

/// Settings for the outbound chat-completion gateway
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub default_model: String,
    pub temperature: f32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Process-wide configuration, fixed from startup to shutdown
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TutorConfig {
    pub gateway: GatewayConfig,
    pub bind_addr: SocketAddr,
    pub question_bank: PathBuf,
    pub static_dir: PathBuf,
    /// Convert assistant replies from Markdown to HTML when rendering
    pub render_markdown: bool,
    /// Models offered by the page's model selector
    pub models: Vec<String>,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            question_bank: PathBuf::from("ape210k_test.json"),
            static_dir: PathBuf::from("static"),
            render_markdown: true,
            models: vec![
                DEFAULT_MODEL.to_string(),
                "openai/gpt-4o-mini".to_string(),
                "anthropic/claude-3.5-haiku".to_string(),
                "deepseek/deepseek-chat".to_string(),
            ],
        }
    }
}

impl TutorConfig {
    /// Loads the file, then overlays `.env` and process environment.
    /// An explicitly named file must exist; the implicit `tutor.toml` may not.
    pub fn load(path: Option<&Path>) -> TutorResult<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", env_file.display());
        }

        let path = match path {
            Some(path) if !path.exists() => {
                return Err(TutorError::ConfigError(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            Some(path) => path,
            None => Path::new(DEFAULT_CONFIG_FILE),
        };
        let mut config = Self::load_from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> TutorResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            TutorError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content)
            .map_err(|e| TutorError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Overlays environment values. Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> TutorResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = get(ENV_API_KEY) {
            self.gateway.api_key = Some(api_key);
        }

        if let Some(addr) = get(ENV_BIND_ADDR) {
            self.bind_addr = addr.trim().parse().map_err(|e| {
                TutorError::ConfigError(format!("Invalid {} '{}': {}", ENV_BIND_ADDR, addr, e))
            })?;
        }

        if let Some(path) = get(ENV_QUESTION_BANK) {
            self.question_bank = PathBuf::from(path);
        }

        if let Some(path) = get(ENV_STATIC_DIR) {
            self.static_dir = PathBuf::from(path);
        }

        Ok(())
    }
}
