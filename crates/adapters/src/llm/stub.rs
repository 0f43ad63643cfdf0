//! Stub provider for testing and offline mode

use async_trait::async_trait;
use carelog_domain::normalize::SummarySanitizer;
use carelog_domain::{
    AiError, AudioInput, CareLog, RiskAssessment, RiskAssessor, Severity, Summarizer,
    SummaryResult, Transcriber, TranscriptionResult,
};

pub const STUB_TRANSCRIPT: &str = "本日は落ち着いて過ごされました。昼食は全量摂取されました。";

/// Deterministic provider implementing every capability without a network
pub struct StubProvider {
    transcript: String,
    assessment: Option<RiskAssessment>,
    error: Option<AiError>,
    sanitizer: SummarySanitizer,
}

impl StubProvider {
    /// Fixed transcript, sanitized-echo summaries, an empty medium assessment
    pub fn new() -> Self {
        Self {
            transcript: STUB_TRANSCRIPT.to_string(),
            assessment: None,
            error: None,
            sanitizer: SummarySanitizer::default(),
        }
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = transcript.into();
        self
    }

    pub fn with_assessment(mut self, assessment: RiskAssessment) -> Self {
        self.assessment = Some(assessment);
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: SummarySanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Create a stub whose every capability fails with `error`
    pub fn with_error(error: AiError) -> Self {
        Self {
            error: Some(error),
            ..Self::new()
        }
    }

    fn check_error(&self) -> Result<(), AiError> {
        let Some(ref error) = self.error else {
            return Ok(());
        };
        Err(match error {
            AiError::Extraction(msg) => AiError::Extraction(msg.clone()),
            AiError::Parse(msg) => AiError::Parse(msg.clone()),
            AiError::Config(msg) => AiError::Config(msg.clone()),
            AiError::ProviderHttp { status, body } => AiError::ProviderHttp {
                status: *status,
                body: body.clone(),
            },
            AiError::Network(msg) => AiError::Network(msg.clone()),
            AiError::Timeout => AiError::Timeout,
            AiError::InvalidResponse(msg) => AiError::InvalidResponse(msg.clone()),
        })
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn transcribe(&self, _audio: &AudioInput) -> Result<TranscriptionResult, AiError> {
        self.check_error()?;
        Ok(TranscriptionResult {
            text: self.transcript.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn summarize(&self, text: &str) -> Result<SummaryResult, AiError> {
        self.check_error()?;
        Ok(SummaryResult {
            summary: self.sanitizer.sanitize(text),
        })
    }
}

#[async_trait]
impl RiskAssessor for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    async fn assess_risk(&self, _care_logs: &[CareLog]) -> Result<RiskAssessment, AiError> {
        self.check_error()?;
        Ok(self.assessment.clone().unwrap_or(RiskAssessment {
            risk_level: Severity::Medium,
            findings: vec![],
            notes: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelog_domain::Finding;

    #[tokio::test]
    async fn test_default_capabilities() {
        let stub = StubProvider::new();

        let transcript = stub
            .transcribe(&AudioInput::new(vec![1, 2, 3], "audio/mpeg"))
            .await
            .unwrap();
        assert_eq!(transcript.text, STUB_TRANSCRIPT);

        let summary = stub.summarize("  本日の様子は安定していました。  ").await.unwrap();
        assert_eq!(summary.summary, "本日の様子は安定していました。");

        let assessment = stub.assess_risk(&[]).await.unwrap();
        assert_eq!(assessment.risk_level, Severity::Medium);
        assert!(assessment.findings.is_empty());
    }

    #[tokio::test]
    async fn test_configured_assessment() {
        let assessment = RiskAssessment {
            risk_level: Severity::High,
            findings: vec![Finding {
                id: "dehydration".to_string(),
                title: "脱水の兆候".to_string(),
                severity: Severity::High,
                evidence: vec!["水分摂取が少ない".to_string()],
                recommendation: "水分補給を促す".to_string(),
                tasks: None,
                goal: None,
            }],
            notes: None,
        };
        let stub = StubProvider::new().with_assessment(assessment.clone());
        assert_eq!(stub.assess_risk(&[]).await.unwrap(), assessment);
    }

    #[tokio::test]
    async fn test_error_stub() {
        let stub = StubProvider::with_error(AiError::Timeout);
        assert!(matches!(stub.summarize("x").await, Err(AiError::Timeout)));
        assert!(matches!(stub.assess_risk(&[]).await, Err(AiError::Timeout)));
    }
}
