//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and the AI providers.
//! Adapters implement them; use cases and tests only ever see the traits.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{AudioInput, CareLog, RiskAssessment, SummaryResult, TranscriptionResult};

/// Error type shared by every AI capability
#[derive(Debug, Error)]
pub enum AiError {
    /// No usable text anywhere in a provider response
    #[error("Extraction error: {0}")]
    Extraction(String),
    /// No valid JSON object could be recovered, even after refinement
    #[error("Parse error: {0}")]
    Parse(String),
    /// Missing credential or unsupported provider selection
    #[error("Configuration error: {0}")]
    Config(String),
    /// Upstream returned a non-success status
    #[error("Provider returned {status}: {body}")]
    ProviderHttp { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout")]
    Timeout,
    /// Response body was not JSON at all
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Speech-to-text capability
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Provider name, e.g. "openai"
    fn name(&self) -> &str;

    async fn transcribe(&self, audio: &AudioInput) -> Result<TranscriptionResult, AiError>;
}

/// Short summary of a caregiver note
#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    async fn summarize(&self, text: &str) -> Result<SummaryResult, AiError>;
}

/// Structured risk assessment over a set of care logs
#[async_trait]
pub trait RiskAssessor: Send + Sync {
    fn name(&self) -> &str;

    async fn assess_risk(&self, care_logs: &[CareLog]) -> Result<RiskAssessment, AiError>;
}

/// Second-chance stage asking the provider to reformat text as strict JSON
#[async_trait]
pub trait JsonRefiner: Send + Sync {
    /// Returns the provider's reformatted text, which may still be unparseable
    async fn refine(&self, raw_text: &str) -> Result<String, AiError>;
}
