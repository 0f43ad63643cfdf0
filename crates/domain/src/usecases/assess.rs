//! Risk path: chat completion → validated risk assessment

use serde_json::Value;

use crate::model::RiskAssessment;
use crate::normalize::{Unwrapped, candidates, extract_json_with, recover_json_span, try_parse_json};
use crate::policy::RiskPolicy;
use crate::ports::{AiError, JsonRefiner};

/// Turns a raw chat completion into a [`RiskAssessment`]
#[derive(Debug, Clone, Default)]
pub struct RiskPipeline {
    policy: RiskPolicy,
}

impl RiskPipeline {
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    /// Text handed to the JSON stage when no candidate holds a valid
    /// assessment.
    ///
    /// A JSON span inside any candidate wins. Reasoning without one is
    /// skipped; regular content is used as-is. If only JSON-less reasoning
    /// exists it goes to the JSON stage anyway so refinement can rescue it.
    pub fn candidate_text(response: &Value) -> Result<String, AiError> {
        select_text(candidates(response)?)
    }

    /// Text of a refinement reply: the answer itself, with reasoning only as a
    /// fallback.
    pub fn refined_text(response: &Value) -> Result<String, AiError> {
        let found = candidates(response)?;
        match found.iter().find(|candidate| !candidate.rule.is_reasoning()) {
            Some(answer) => Ok(answer.text.clone()),
            None => select_text(found),
        }
    }

    /// The first candidate whose JSON passes the policy wins outright.
    /// Otherwise the best candidate text goes through JSON extraction, where
    /// a missing or rejected object gets one refinement attempt.
    pub async fn assess_response(
        &self,
        response: &Value,
        refiner: Option<&dyn JsonRefiner>,
    ) -> Result<RiskAssessment, AiError> {
        let found = candidates(response)?;

        for candidate in &found {
            let Some(object) = try_parse_json(&candidate.text) else {
                continue;
            };
            match self.policy.parse(object) {
                Ok(assessment) => {
                    tracing::debug!(rule = ?candidate.rule, "Risk assessment accepted");
                    return Ok(assessment);
                }
                Err(violation) => {
                    tracing::debug!(rule = ?candidate.rule, error = %violation, "Candidate failed validation");
                }
            }
        }

        let text = select_text(found)?;
        extract_json_with(&text, refiner, |object| self.policy.parse(object))
            .await
            .inspect_err(|e| {
                if matches!(e, AiError::Parse(_)) {
                    tracing::error!(raw = %response, error = %e, "Risk assessment failed validation");
                }
            })
    }
}

fn select_text(found: Vec<Unwrapped>) -> Result<String, AiError> {
    for candidate in &found {
        if let Some(span) = recover_json_span(&candidate.text) {
            return Ok(span.to_string());
        }
        if !candidate.rule.is_reasoning() {
            return Ok(candidate.text.clone());
        }
    }

    found
        .into_iter()
        .next()
        .map(|candidate| candidate.text)
        .ok_or_else(|| AiError::Extraction("content is empty".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use crate::normalize::json::PARSE_FAILURE;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Refiner(&'static str);

    #[async_trait]
    impl JsonRefiner for Refiner {
        async fn refine(&self, _raw_text: &str) -> Result<String, AiError> {
            Ok(self.0.to_string())
        }
    }

    struct CountingRefiner {
        output: &'static str,
        calls: AtomicUsize,
    }

    impl CountingRefiner {
        fn new(output: &'static str) -> Self {
            Self {
                output,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl JsonRefiner for CountingRefiner {
        async fn refine(&self, _raw_text: &str) -> Result<String, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.to_string())
        }
    }

    struct FailingRefiner;

    #[async_trait]
    impl JsonRefiner for FailingRefiner {
        async fn refine(&self, _raw_text: &str) -> Result<String, AiError> {
            Err(AiError::ProviderHttp {
                status: 500,
                body: "down".to_string(),
            })
        }
    }

    fn completion(content: &str) -> Value {
        json!({"choices": [{"message": {"content": content}}]})
    }

    #[test]
    fn test_candidate_prefers_json_in_reasoning() {
        let response = json!({"choices": [{"message": {
            "reasoning_content": "Draft: {\"riskLevel\": \"high\", \"findings\": []}",
            "content": "prose"
        }}]});
        assert_eq!(
            RiskPipeline::candidate_text(&response).unwrap(),
            "{\"riskLevel\": \"high\", \"findings\": []}"
        );
    }

    #[test]
    fn test_candidate_skips_reasoning_without_json() {
        let response = json!({"choices": [{"message": {
            "reasoning_content": "thinking",
            "content": "plain content"
        }}]});
        assert_eq!(RiskPipeline::candidate_text(&response).unwrap(), "plain content");
    }

    #[tokio::test]
    async fn test_fenced_assessment() {
        let response = completion("```json\n{\"riskLevel\":\"high\",\"findings\":[],\"notes\":\"ok\"}\n```");
        let result = RiskPipeline::default().assess_response(&response, None).await.unwrap();
        assert_eq!(result.risk_level, Severity::High);
        assert!(result.findings.is_empty());
        assert_eq!(result.notes.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_refinement_used_for_prose() {
        let response = completion("リスクは中程度です。");
        let refiner = Refiner(r#"{"riskLevel": "medium", "findings": []}"#);
        let result = RiskPipeline::default()
            .assess_response(&response, Some(&refiner))
            .await
            .unwrap();
        assert_eq!(result.risk_level, Severity::Medium);
    }

    #[tokio::test]
    async fn test_invalid_shape_is_parse_error() {
        let response = completion(r#"{"riskLevel": "critical", "findings": []}"#);
        let err = RiskPipeline::default().assess_response(&response, None).await.unwrap_err();
        assert!(matches!(err, AiError::Parse(msg) if msg.starts_with(PARSE_FAILURE)));
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_refined() {
        let response = completion(r#"{"risk_level":"high","findings":[]}"#);
        let refiner = CountingRefiner::new(r#"{"riskLevel":"high","findings":[]}"#);
        let result = RiskPipeline::default()
            .assess_response(&response, Some(&refiner))
            .await
            .unwrap();
        assert_eq!(result.risk_level, Severity::High);
        assert_eq!(refiner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_schema_mismatch_after_refinement_is_parse_error() {
        let response = completion(r#"{"risk_level":"high","findings":[]}"#);
        let refiner = CountingRefiner::new(r#"{"riskLevel":"severe","findings":[]}"#);
        let err = RiskPipeline::default()
            .assess_response(&response, Some(&refiner))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Parse(msg) if msg.starts_with(PARSE_FAILURE)));
        assert_eq!(refiner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_echoed_schema_in_reasoning_does_not_shadow_content() {
        let response = json!({"choices": [{"message": {
            "reasoning_content": r#"The schema is {"riskLevel": "medium|high", "findings": []} so I will answer."#,
            "content": r#"{"riskLevel":"high","findings":[]}"#
        }}]});
        let refiner = CountingRefiner::new("{}");
        let result = RiskPipeline::default()
            .assess_response(&response, Some(&refiner))
            .await
            .unwrap();
        assert_eq!(result.risk_level, Severity::High);
        assert_eq!(refiner.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_refined_text_prefers_content() {
        let response = json!({"choices": [{"message": {
            "reasoning_content": r#"Echo {"riskLevel": "medium|high"}"#,
            "content": r#"{"riskLevel":"low","findings":[]}"#
        }}]});
        assert_eq!(
            RiskPipeline::refined_text(&response).unwrap(),
            r#"{"riskLevel":"low","findings":[]}"#
        );

        let reasoning_only = json!({"choices": [{"message": {
            "content": null,
            "reasoning_content": r#"Draft {"riskLevel":"low","findings":[]} done"#
        }}]});
        assert_eq!(
            RiskPipeline::refined_text(&reasoning_only).unwrap(),
            r#"{"riskLevel":"low","findings":[]}"#
        );
    }

    #[tokio::test]
    async fn test_refiner_errors_propagate() {
        let response = completion("not json");
        let err = RiskPipeline::default()
            .assess_response(&response, Some(&FailingRefiner))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::ProviderHttp { status: 500, .. }));
    }
}
