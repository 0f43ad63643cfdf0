//! AI provider adapters

pub mod factory;
pub mod prompts;
pub mod risk;
pub mod stub;
pub mod summarizer;
pub mod transcription;
pub mod transport;

pub use factory::{
    Capability, PipelineOptions, ProviderHandle, get_provider, get_provider_with,
    supported_providers,
};
pub use risk::ChatRiskAssessor;
pub use stub::{STUB_TRANSCRIPT, StubProvider};
pub use summarizer::ChatSummarizer;
pub use transcription::WhisperTranscriber;
pub use transport::{ChatMessage, ChatRequest, ChatTransport, ResponseFormat};

use carelog_domain::AiError;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const SAKURA_BASE_URL: &str = "https://api.ai.sakura.ad.jp/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const OPENAI_TRANSCRIPTION_MODEL: &str = "whisper-1";
pub const SAKURA_TRANSCRIPTION_MODEL: &str = "whisper-large-v3-turbo";

/// Per-request provider settings
#[derive(Debug)]
pub struct ProviderConfig {
    /// Provider name, e.g. "sakura"
    pub provider: String,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            api_key: None,
            base_url: None,
            model: None,
            timeout_secs: 60,
        }
    }

    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The API key, or a configuration error when absent or blank
    pub fn require_api_key(&self) -> Result<SecretString, AiError> {
        match &self.api_key {
            Some(key) if !key.expose_secret().trim().is_empty() => {
                Ok(SecretString::new(key.expose_secret().into()))
            }
            _ => Err(AiError::Config(format!(
                "Missing API key for provider {}",
                self.provider
            ))),
        }
    }

    /// Configured base URL without a trailing slash, or `default`
    pub fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn model_or(&self, default: &str) -> String {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, AiError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AiError::Config(format!("Failed to build HTTP client: {}", e)))
}

pub(crate) fn map_send_error(error: reqwest::Error) -> AiError {
    if error.is_timeout() {
        AiError::Timeout
    } else {
        AiError::Network(error.to_string())
    }
}
