//! Whisper-style speech-to-text over `POST {base_url}/audio/transcriptions`

use async_trait::async_trait;
use carelog_domain::{AiError, AudioInput, Transcriber, TranscriptionResult};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{
    OPENAI_BASE_URL, OPENAI_TRANSCRIPTION_MODEL, ProviderConfig, SAKURA_BASE_URL,
    SAKURA_TRANSCRIPTION_MODEL, http_client, map_send_error,
};

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

/// Multipart transcription client shared by the OpenAI and Sakura endpoints
pub struct WhisperTranscriber {
    name: String,
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(
        name: impl Into<String>,
        api_key: SecretString,
        base_url: String,
        model: String,
        config: &ProviderConfig,
    ) -> Result<Self, AiError> {
        Ok(Self {
            name: name.into(),
            client: http_client(config.timeout())?,
            api_key,
            base_url,
            model,
        })
    }

    pub fn openai(config: &ProviderConfig) -> Result<Self, AiError> {
        Self::new(
            "openai",
            config.require_api_key()?,
            config.base_url_or(OPENAI_BASE_URL),
            config.model_or(OPENAI_TRANSCRIPTION_MODEL),
            config,
        )
    }

    pub fn sakura(config: &ProviderConfig) -> Result<Self, AiError> {
        Self::new(
            "sakura",
            config.require_api_key()?,
            config.base_url_or(SAKURA_BASE_URL),
            config.model_or(SAKURA_TRANSCRIPTION_MODEL),
            config,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_form(&self, audio: &AudioInput) -> Result<Form, AiError> {
        let file = Part::bytes(audio.bytes.clone())
            .file_name(format!("audio.{}", audio.extension()))
            .mime_str(&audio.mime_type)
            .map_err(|e| {
                AiError::Config(format!("Invalid audio MIME type {}: {}", audio.mime_type, e))
            })?;

        Ok(Form::new()
            .part("file", file)
            .text("model", self.model.clone()))
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    fn name(&self) -> &str {
        &self.name
    }

    async fn transcribe(&self, audio: &AudioInput) -> Result<TranscriptionResult, AiError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        tracing::debug!(provider = %self.name, model = %self.model, url = %url, "Sending audio");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .multipart(self.build_form(audio)?)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(provider = %self.name, status = %status, body = %body, "Transcription failed");
            return Err(AiError::ProviderHttp {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        Ok(TranscriptionResult { text: parsed.text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> ProviderConfig {
        ProviderConfig::new("sakura")
            .with_api_key(SecretString::new("key".into()))
            .with_base_url(server.uri())
    }

    fn audio() -> AudioInput {
        AudioInput::new(b"RIFF-fake-wave".to_vec(), "audio/wav")
    }

    #[tokio::test]
    async fn test_transcribe_uploads_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(header("Authorization", "Bearer key"))
            .and(body_string_contains("filename=\"audio.wav\""))
            .and(body_string_contains("whisper-large-v3-turbo"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"text": "今日は散歩に行きました"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transcriber = WhisperTranscriber::sakura(&config(&server)).unwrap();
        let result = transcriber.transcribe(&audio()).await.unwrap();
        assert_eq!(result.text, "今日は散歩に行きました");
    }

    #[tokio::test]
    async fn test_openai_uses_whisper_1() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .and(body_string_contains("whisper-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let transcriber = WhisperTranscriber::openai(&config(&server)).unwrap();
        assert_eq!(transcriber.name(), "openai");
        assert_eq!(transcriber.model(), "whisper-1");
        assert_eq!(transcriber.transcribe(&audio()).await.unwrap().text, "ok");
    }

    #[tokio::test]
    async fn test_http_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(413).set_body_string("too large"))
            .mount(&server)
            .await;

        let transcriber = WhisperTranscriber::sakura(&config(&server)).unwrap();
        let err = transcriber.transcribe(&audio()).await.unwrap_err();
        assert!(matches!(err, AiError::ProviderHttp { status: 413, .. }));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let result = WhisperTranscriber::openai(&ProviderConfig::new("openai"));
        assert!(matches!(result, Err(AiError::Config(_))));
    }
}
