//! Chat-completion risk assessor with a JSON refinement stage

use async_trait::async_trait;
use carelog_domain::usecases::RiskPipeline;
use carelog_domain::{AiError, CareLog, JsonRefiner, RiskAssessment, RiskAssessor};

use super::prompts::{refine_system_prompt, risk_system_prompt, risk_user_content};
use super::transport::{ChatMessage, ChatRequest, ChatTransport};

const RISK_MAX_TOKENS: u32 = 1200;
const REFINE_MAX_TOKENS: u32 = 800;

/// Risk assessor backed by an OpenAI-compatible chat endpoint.
///
/// Also acts as its own [`JsonRefiner`]: output that is not a valid
/// assessment is sent back to the same model with a reformatting prompt.
pub struct ChatRiskAssessor {
    name: String,
    transport: ChatTransport,
    model: String,
    pipeline: RiskPipeline,
}

impl ChatRiskAssessor {
    pub fn new(
        name: impl Into<String>,
        transport: ChatTransport,
        model: impl Into<String>,
        pipeline: RiskPipeline,
    ) -> Self {
        Self {
            name: name.into(),
            transport,
            model: model.into(),
            pipeline,
        }
    }

    fn json_request(&self, system: String, user: String, max_tokens: u32) -> ChatRequest {
        ChatRequest::new(
            self.model.clone(),
            vec![ChatMessage::system(system), ChatMessage::user(user)],
        )
        .json_mode()
        .temperature(0.0)
        .top_p(1.0)
        .max_tokens(max_tokens)
    }
}

#[async_trait]
impl RiskAssessor for ChatRiskAssessor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn assess_risk(&self, care_logs: &[CareLog]) -> Result<RiskAssessment, AiError> {
        tracing::info!(provider = %self.name, logs = care_logs.len(), "Assessing risk");

        let request = self.json_request(
            risk_system_prompt(),
            risk_user_content(care_logs),
            RISK_MAX_TOKENS,
        );
        let response = self.transport.complete(&request).await?;
        let refiner: &dyn JsonRefiner = self;
        let assessment = self
            .pipeline
            .assess_response(&response, Some(refiner))
            .await?;

        tracing::info!(
            provider = %self.name,
            risk_level = assessment.risk_level.as_str(),
            findings = assessment.findings.len(),
            "Risk assessed"
        );
        Ok(assessment)
    }
}

#[async_trait]
impl JsonRefiner for ChatRiskAssessor {
    async fn refine(&self, raw_text: &str) -> Result<String, AiError> {
        let request = self.json_request(
            refine_system_prompt(),
            raw_text.to_string(),
            REFINE_MAX_TOKENS,
        );
        let response = self.transport.complete(&request).await?;

        // An empty refinement is reported by the caller as a parse failure.
        match RiskPipeline::refined_text(&response) {
            Ok(text) => Ok(text),
            Err(AiError::Extraction(reason)) => {
                tracing::warn!(reason = %reason, "Refinement returned no content");
                Ok(String::new())
            }
            Err(other) => Err(other),
        }
    }
}
