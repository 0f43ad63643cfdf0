//! Summary path: chat completion → summary text

use serde_json::Value;

use crate::normalize::{SummarySanitizer, candidates, extract_summary_candidate, postprocess_candidate};
use crate::ports::AiError;

/// Turns a raw chat completion into a sanitized summary
#[derive(Debug, Clone, Default)]
pub struct SummaryPipeline {
    sanitizer: SummarySanitizer,
}

impl SummaryPipeline {
    pub fn new(sanitizer: SummarySanitizer) -> Self {
        Self { sanitizer }
    }

    pub fn sanitizer(&self) -> &SummarySanitizer {
        &self.sanitizer
    }

    /// Reasoning candidates are mined for an answer first; when none is found
    /// the next regular candidate is used, and as a last resort the raw
    /// reasoning itself is sanitized.
    pub fn summarize_response(&self, response: &Value) -> Result<String, AiError> {
        let mut unresolved_reasoning: Option<String> = None;

        for candidate in candidates(response)? {
            if !candidate.rule.is_reasoning() {
                return Ok(self.sanitizer.sanitize(&candidate.text));
            }

            match extract_summary_candidate(self.sanitizer.profile(), &candidate.text) {
                Some(answer) => {
                    tracing::debug!(rule = ?candidate.rule, "Summary recovered from reasoning");
                    return Ok(self.sanitizer.sanitize(&postprocess_candidate(&answer)));
                }
                None => {
                    unresolved_reasoning.get_or_insert(candidate.text);
                }
            }
        }

        let reasoning = unresolved_reasoning
            .ok_or_else(|| AiError::Extraction("content is empty".to_string()))?;
        tracing::warn!("No answer found in reasoning, sanitizing it directly");
        Ok(self.sanitizer.sanitize(&reasoning))
    }
}
