//! Chat-completion summarizer

use async_trait::async_trait;
use carelog_domain::usecases::SummaryPipeline;
use carelog_domain::{AiError, Summarizer, SummaryResult};

use super::prompts::summary_system_prompt;
use super::transport::{ChatMessage, ChatRequest, ChatTransport};

const SUMMARY_TEMPERATURE: f64 = 0.2;
const SUMMARY_MAX_TOKENS: u32 = 320;

/// Summarizer backed by an OpenAI-compatible chat endpoint
pub struct ChatSummarizer {
    name: String,
    transport: ChatTransport,
    model: String,
    pipeline: SummaryPipeline,
}

impl ChatSummarizer {
    pub fn new(
        name: impl Into<String>,
        transport: ChatTransport,
        model: impl Into<String>,
        pipeline: SummaryPipeline,
    ) -> Self {
        Self {
            name: name.into(),
            transport,
            model: model.into(),
            pipeline,
        }
    }

    fn build_request(&self, text: &str) -> ChatRequest {
        ChatRequest::new(
            self.model.clone(),
            vec![
                ChatMessage::system(summary_system_prompt()),
                ChatMessage::user(text),
            ],
        )
        .temperature(SUMMARY_TEMPERATURE)
        .max_tokens(SUMMARY_MAX_TOKENS)
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn summarize(&self, text: &str) -> Result<SummaryResult, AiError> {
        let response = self.transport.complete(&self.build_request(text)).await?;
        let summary = self.pipeline.summarize_response(&response)?;

        tracing::debug!(provider = %self.name, chars = summary.chars().count(), "Summary produced");
        Ok(SummaryResult { summary })
    }
}
