//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub summary: SummaryConfig,

    #[serde(default)]
    pub risk: RiskConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Provider for summarization and risk assessment
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_transcription_provider")]
    pub transcription_provider: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub sakura: SakuraConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_openai_transcription_model")]
    pub transcription_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SakuraConfig {
    #[serde(default = "default_sakura_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_sakura_base_url")]
    pub base_url: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_sakura_transcription_model")]
    pub transcription_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Reject findings with too many tasks instead of truncating them
    #[serde(default = "default_true")]
    pub strict_validation: bool,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_provider() -> String {
    "sakura".to_string()
}

fn default_transcription_provider() -> String {
    "openai".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base_url() -> String {
    carelog_adapters::OPENAI_BASE_URL.to_string()
}

fn default_openai_transcription_model() -> String {
    carelog_adapters::OPENAI_TRANSCRIPTION_MODEL.to_string()
}

fn default_sakura_api_key_env() -> String {
    "SAKURA_API_KEY".to_string()
}

fn default_sakura_base_url() -> String {
    carelog_adapters::SAKURA_BASE_URL.to_string()
}

fn default_chat_model() -> String {
    carelog_adapters::DEFAULT_CHAT_MODEL.to_string()
}

fn default_sakura_transcription_model() -> String {
    carelog_adapters::SAKURA_TRANSCRIPTION_MODEL.to_string()
}

fn default_max_chars() -> usize {
    200
}

fn default_max_sentences() -> usize {
    2
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            transcription_provider: default_transcription_provider(),
            timeout_secs: default_timeout(),
            openai: OpenAiConfig::default(),
            sakura: SakuraConfig::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_api_key_env(),
            base_url: default_openai_base_url(),
            transcription_model: default_openai_transcription_model(),
        }
    }
}

impl Default for SakuraConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_sakura_api_key_env(),
            base_url: default_sakura_base_url(),
            chat_model: default_chat_model(),
            transcription_model: default_sakura_transcription_model(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            max_sentences: default_max_sentences(),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            strict_validation: default_true(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("CARELOG")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# carelog configuration

[general]
log_level = "info"

[ai]
provider = "sakura"                # sakura, stub (summarization and risk assessment)
transcription_provider = "openai"  # openai, sakura, stub
timeout_secs = 60

[ai.openai]
api_key_env = "OPENAI_API_KEY"
base_url = "https://api.openai.com/v1"
transcription_model = "whisper-1"

[ai.sakura]
api_key_env = "SAKURA_API_KEY"
base_url = "https://api.ai.sakura.ad.jp/v1"
chat_model = "gpt-4o-mini"
transcription_model = "whisper-large-v3-turbo"

[summary]
max_chars = 200
max_sentences = 2

[risk]
# false truncates findings to three tasks instead of rejecting them
strict_validation = true
"#
        .to_string()
    }
}
