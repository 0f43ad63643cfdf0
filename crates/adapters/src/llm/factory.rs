//! Provider selection per capability
//!
//! Callers pass an explicit [`ProviderConfig`]; nothing here reads the
//! environment.

use carelog_domain::normalize::{SanitizeLimits, ScriptProfile, SummarySanitizer};
use carelog_domain::policy::{RiskPolicy, RiskPolicyConfig};
use carelog_domain::usecases::{RiskPipeline, SummaryPipeline};
use carelog_domain::{AiError, RiskAssessor, Summarizer, Transcriber};
use std::fmt;

use super::risk::ChatRiskAssessor;
use super::stub::StubProvider;
use super::summarizer::ChatSummarizer;
use super::transcription::WhisperTranscriber;
use super::transport::ChatTransport;
use super::{DEFAULT_CHAT_MODEL, ProviderConfig, SAKURA_BASE_URL};

/// What the caller wants a provider for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Transcription,
    Summarization,
    RiskAssessment,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Transcription => write!(f, "transcription"),
            Capability::Summarization => write!(f, "summarization"),
            Capability::RiskAssessment => write!(f, "risk assessment"),
        }
    }
}

/// Provider names accepted for `capability`
pub fn supported_providers(capability: Capability) -> &'static [&'static str] {
    match capability {
        Capability::Transcription => &["openai", "sakura", "stub"],
        Capability::Summarization | Capability::RiskAssessment => &["sakura", "stub"],
    }
}

/// Tuning of the normalization stages behind the chat capabilities
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub summary: SanitizeLimits,
    pub risk: RiskPolicyConfig,
}

impl PipelineOptions {
    fn summary_pipeline(&self) -> SummaryPipeline {
        SummaryPipeline::new(self.sanitizer())
    }

    fn risk_pipeline(&self) -> RiskPipeline {
        RiskPipeline::new(RiskPolicy::new(self.risk.clone()))
    }

    fn sanitizer(&self) -> SummarySanitizer {
        SummarySanitizer::new(ScriptProfile::japanese(), self.summary)
    }
}

/// A constructed provider for one capability
pub enum ProviderHandle {
    Transcriber(Box<dyn Transcriber>),
    Summarizer(Box<dyn Summarizer>),
    RiskAssessor(Box<dyn RiskAssessor>),
}

impl ProviderHandle {
    pub fn capability(&self) -> Capability {
        match self {
            ProviderHandle::Transcriber(_) => Capability::Transcription,
            ProviderHandle::Summarizer(_) => Capability::Summarization,
            ProviderHandle::RiskAssessor(_) => Capability::RiskAssessment,
        }
    }

    pub fn into_transcriber(self) -> Result<Box<dyn Transcriber>, AiError> {
        match self {
            ProviderHandle::Transcriber(inner) => Ok(inner),
            other => Err(other.mismatch(Capability::Transcription)),
        }
    }

    pub fn into_summarizer(self) -> Result<Box<dyn Summarizer>, AiError> {
        match self {
            ProviderHandle::Summarizer(inner) => Ok(inner),
            other => Err(other.mismatch(Capability::Summarization)),
        }
    }

    pub fn into_risk_assessor(self) -> Result<Box<dyn RiskAssessor>, AiError> {
        match self {
            ProviderHandle::RiskAssessor(inner) => Ok(inner),
            other => Err(other.mismatch(Capability::RiskAssessment)),
        }
    }

    fn mismatch(&self, wanted: Capability) -> AiError {
        AiError::Config(format!(
            "Provider built for {} cannot be used for {}",
            self.capability(),
            wanted
        ))
    }
}

/// Build a provider with default pipeline options
pub fn get_provider(
    capability: Capability,
    config: &ProviderConfig,
) -> Result<ProviderHandle, AiError> {
    get_provider_with(capability, config, &PipelineOptions::default())
}

/// Build a provider for `capability` from `config`.
///
/// Fails with [`AiError::Config`] for an unknown or unsupported provider name
/// or a missing credential, before any network call.
pub fn get_provider_with(
    capability: Capability,
    config: &ProviderConfig,
    options: &PipelineOptions,
) -> Result<ProviderHandle, AiError> {
    let provider = config.provider.trim().to_ascii_lowercase();
    if !supported_providers(capability).contains(&provider.as_str()) {
        return Err(AiError::Config(format!(
            "Unsupported {} provider: {} (supported: {})",
            capability,
            config.provider,
            supported_providers(capability).join(", ")
        )));
    }

    tracing::debug!(provider = %provider, capability = %capability, "Building provider");

    let handle = match (capability, provider.as_str()) {
        (Capability::Transcription, "stub") => {
            ProviderHandle::Transcriber(Box::new(StubProvider::new()))
        }
        (Capability::Summarization, "stub") => ProviderHandle::Summarizer(Box::new(
            StubProvider::new().with_sanitizer(options.sanitizer()),
        )),
        (Capability::RiskAssessment, "stub") => {
            ProviderHandle::RiskAssessor(Box::new(StubProvider::new()))
        }
        (Capability::Transcription, "openai") => {
            ProviderHandle::Transcriber(Box::new(WhisperTranscriber::openai(config)?))
        }
        (Capability::Transcription, _) => {
            ProviderHandle::Transcriber(Box::new(WhisperTranscriber::sakura(config)?))
        }
        (Capability::Summarization, _) => ProviderHandle::Summarizer(Box::new(ChatSummarizer::new(
            provider.clone(),
            sakura_transport(config)?,
            config.model_or(DEFAULT_CHAT_MODEL),
            options.summary_pipeline(),
        ))),
        (Capability::RiskAssessment, _) => {
            ProviderHandle::RiskAssessor(Box::new(ChatRiskAssessor::new(
                provider.clone(),
                sakura_transport(config)?,
                config.model_or(DEFAULT_CHAT_MODEL),
                options.risk_pipeline(),
            )))
        }
    };

    Ok(handle)
}

fn sakura_transport(config: &ProviderConfig) -> Result<ChatTransport, AiError> {
    ChatTransport::new(
        config.require_api_key()?,
        config.base_url_or(SAKURA_BASE_URL),
        config.timeout(),
    )
}
