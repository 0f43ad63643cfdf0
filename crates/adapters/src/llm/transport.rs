//! OpenAI-compatible chat completion transport
//!
//! Sends a request with the preferred options. When the provider rejects the
//! JSON response mode (HTTP 400/422) the request is rebuilt without it and
//! sent exactly once more. Any other non-success status is terminal.

use carelog_domain::AiError;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::{http_client, map_send_error};

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            response_format: None,
            temperature: None,
            top_p: None,
            max_tokens: None,
        }
    }

    pub fn json_mode(mut self) -> Self {
        self.response_format = Some(ResponseFormat::json_object());
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn has_json_mode(&self) -> bool {
        self.response_format.is_some()
    }

    /// Same request without the JSON response mode
    pub fn without_json_mode(&self) -> Self {
        Self {
            response_format: None,
            ..self.clone()
        }
    }
}

/// Statuses a provider uses to reject an unsupported request option
fn is_option_rejection(status: StatusCode) -> bool {
    status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY
}

/// Bearer-authenticated client for `POST {base_url}/chat/completions`
pub struct ChatTransport {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl ChatTransport {
    pub fn new(api_key: SecretString, base_url: String, timeout: Duration) -> Result<Self, AiError> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            base_url,
        })
    }

    /// Send `request`, dropping JSON mode once if the provider rejects it,
    /// and return the parsed response body
    pub async fn complete(&self, request: &ChatRequest) -> Result<Value, AiError> {
        let mut response = self.send(request).await?;

        if request.has_json_mode() && is_option_rejection(response.status()) {
            tracing::warn!(
                status = %response.status(),
                model = %request.model,
                "Provider rejected JSON response mode, retrying without it"
            );
            response = self.send(&request.without_json_mode()).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Chat completion failed");
            return Err(AiError::ProviderHttp {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response, AiError> {
        let url = format!("{}/chat/completions", self.base_url);

        self.client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .map_err(map_send_error)
    }
}
