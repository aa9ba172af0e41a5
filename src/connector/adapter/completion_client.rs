use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ModelClient;
use crate::domain::{DomainError, ModelEnvelope, ModelOutput};

pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const TEMPERATURE: f32 = 0.5;
const SERVICE_NAME: &str = "OpenAI";

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ApiResponse {
    fn into_envelope(self) -> ModelEnvelope {
        ModelEnvelope {
            results: Some(
                self.choices
                    .into_iter()
                    .map(|c| ModelOutput {
                        output_text: c.message.and_then(|m| m.content),
                        completion_reason: c.finish_reason,
                    })
                    .collect(),
            ),
        }
    }
}

/// Client for an OpenAI-compatible chat completions endpoint.
///
/// The prompt goes out as a single user message; each returned choice becomes one
/// envelope result, so an empty `choices` list reaches the normalizer as an
/// empty `results` list.
pub struct CompletionClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            url,
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn parse_response(body: &str) -> Result<ModelEnvelope, DomainError> {
        serde_json::from_str::<ApiResponse>(body)
            .map(ApiResponse::into_envelope)
            .map_err(|e| DomainError::malformed(format!("failed to parse completion: {}", e)))
    }
}

#[async_trait]
impl ModelClient for CompletionClient {
    async fn invoke(&self, prompt: &str) -> Result<ModelEnvelope, DomainError> {
        let request = ApiRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("POST {} (model={})", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::network(
                        SERVICE_NAME,
                        format!("request timed out after {}s", self.timeout.as_secs()),
                    )
                } else {
                    DomainError::network(SERVICE_NAME, format!("request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("{} returned {}: {}", SERVICE_NAME, status, body);
            return Err(DomainError::network(
                SERVICE_NAME,
                format!("API returned {}{}", status, error_message(&body)),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::network(SERVICE_NAME, format!("failed to read body: {}", e)))?;

        Self::parse_response(&body)
    }

    fn service_name(&self) -> &str {
        SERVICE_NAME
    }
}

/// `": <message>"` from an `{"error": {"message": ...}}` body, empty otherwise.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(|m| format!(": {}", m))
        })
        .unwrap_or_default()
}
