//! Log preview: transcribe a recording, then summarize the transcript

use thiserror::Error;

use crate::model::{AudioInput, LogPreview, MAX_AUDIO_BYTES};
use crate::ports::{AiError, Summarizer, Transcriber};

/// Failure of a preview, tagged with the step that failed
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),
    #[error("Transcription failed: {0}")]
    Transcription(#[source] AiError),
    #[error("No speech could be recognized in the recording")]
    EmptyTranscript,
    #[error("Summarization failed: {0}")]
    Summarization(#[source] AiError),
}

impl PreviewError {
    /// Step name reported to clients
    pub fn step(&self) -> &'static str {
        match self {
            PreviewError::InvalidAudio(_) => "validation",
            PreviewError::Transcription(_) | PreviewError::EmptyTranscript => "transcription",
            PreviewError::Summarization(_) => "summarization",
        }
    }
}

/// Use case wiring a transcriber to a summarizer
pub struct LogPreviewUseCase<'a> {
    transcriber: &'a dyn Transcriber,
    summarizer: &'a dyn Summarizer,
}

impl<'a> LogPreviewUseCase<'a> {
    pub fn new(transcriber: &'a dyn Transcriber, summarizer: &'a dyn Summarizer) -> Self {
        Self {
            transcriber,
            summarizer,
        }
    }

    pub async fn preview(&self, audio: &AudioInput) -> Result<LogPreview, PreviewError> {
        validate_audio(audio)?;

        tracing::info!(
            transcriber = self.transcriber.name(),
            bytes = audio.bytes.len(),
            mime_type = %audio.mime_type,
            "Transcribing recording"
        );
        let transcript = self
            .transcriber
            .transcribe(audio)
            .await
            .map_err(PreviewError::Transcription)?
            .text;

        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(PreviewError::EmptyTranscript);
        }

        let summary = self
            .summarizer
            .summarize(transcript)
            .await
            .map_err(PreviewError::Summarization)?
            .summary;

        Ok(LogPreview {
            transcript: transcript.to_string(),
            summary,
        })
    }
}

fn validate_audio(audio: &AudioInput) -> Result<(), PreviewError> {
    if audio.bytes.is_empty() {
        return Err(PreviewError::InvalidAudio("recording is empty".to_string()));
    }
    if audio.bytes.len() > MAX_AUDIO_BYTES {
        return Err(PreviewError::InvalidAudio(format!(
            "recording is {} bytes (limit {} bytes)",
            audio.bytes.len(),
            MAX_AUDIO_BYTES
        )));
    }
    if !audio.is_supported() {
        return Err(PreviewError::InvalidAudio(format!(
            "unsupported audio type: {}",
            audio.mime_type
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SummaryResult, TranscriptionResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeTranscriber(&'static str);

    #[async_trait]
    impl Transcriber for FakeTranscriber {
        fn name(&self) -> &str {
            "fake"
        }

        async fn transcribe(&self, _audio: &AudioInput) -> Result<TranscriptionResult, AiError> {
            Ok(TranscriptionResult {
                text: self.0.to_string(),
            })
        }
    }

    #[derive(Default)]
    struct CountingSummarizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Summarizer for CountingSummarizer {
        fn name(&self) -> &str {
            "counting"
        }

        async fn summarize(&self, text: &str) -> Result<SummaryResult, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SummaryResult {
                summary: format!("要約:{}", text),
            })
        }
    }

    fn audio() -> AudioInput {
        AudioInput::new(vec![1, 2, 3], "audio/m4a")
    }

    #[tokio::test]
    async fn test_preview_transcribes_then_summarizes() {
        let transcriber = FakeTranscriber("  今日は散歩に行きました  ");
        let summarizer = CountingSummarizer::default();
        let usecase = LogPreviewUseCase::new(&transcriber, &summarizer);

        let preview = usecase.preview(&audio()).await.unwrap();
        assert_eq!(preview.transcript, "今日は散歩に行きました");
        assert_eq!(preview.summary, "要約:今日は散歩に行きました");
    }

    #[tokio::test]
    async fn test_empty_transcript_skips_summary() {
        let transcriber = FakeTranscriber("   ");
        let summarizer = CountingSummarizer::default();
        let usecase = LogPreviewUseCase::new(&transcriber, &summarizer);

        let err = usecase.preview(&audio()).await.unwrap_err();
        assert!(matches!(err, PreviewError::EmptyTranscript));
        assert_eq!(err.step(), "transcription");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejects_empty_audio() {
        let transcriber = FakeTranscriber("text");
        let summarizer = CountingSummarizer::default();
        let usecase = LogPreviewUseCase::new(&transcriber, &summarizer);

        let err = usecase
            .preview(&AudioInput::new(vec![], "audio/wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, PreviewError::InvalidAudio(_)));
    }

    #[tokio::test]
    async fn test_rejects_unsupported_type() {
        let transcriber = FakeTranscriber("text");
        let summarizer = CountingSummarizer::default();
        let usecase = LogPreviewUseCase::new(&transcriber, &summarizer);

        let err = usecase
            .preview(&AudioInput::new(vec![1, 2, 3], "text/plain"))
            .await
            .unwrap_err();
        assert!(matches!(&err, PreviewError::InvalidAudio(msg) if msg.contains("text/plain")));
        assert_eq!(err.step(), "validation");
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }
}
