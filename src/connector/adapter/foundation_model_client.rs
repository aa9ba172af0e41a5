use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::application::ModelClient;
use crate::domain::{DomainError, ModelEnvelope};

use super::sigv4::{uri_encode_segment, AwsCredentials, SigV4Signer};

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "amazon.titan-text-express-v1";
const SIGNING_SERVICE: &str = "bedrock";
const SERVICE_NAME: &str = "Bedrock";

#[derive(Serialize)]
struct InvokeRequest<'a> {
    #[serde(rename = "inputText")]
    input_text: &'a str,
}

/// Default runtime endpoint for a region.
pub fn default_endpoint(region: &str) -> String {
    format!("https://bedrock-runtime.{}.amazonaws.com", region)
}

/// HTTP client for a cloud-hosted foundation model taking `{"inputText": ...}` and
/// answering `{"results": [{"outputText": ...}]}`.
///
/// Every request is signed with AWS Signature V4 from the injected credentials.
/// The reply body is handed back as a [`ModelEnvelope`] without further checks;
/// deciding whether it holds an answer is the normalizer's job.
pub struct FoundationModelClient {
    client: reqwest::Client,
    signer: SigV4Signer,
    /// `scheme://host[:port]`, e.g. `https://bedrock-runtime.us-east-1.amazonaws.com`.
    endpoint: String,
    /// `host[:port]` as it appears in the `Host` header.
    host: String,
    /// Path of the configured endpoint without trailing slash; empty unless the
    /// endpoint is a proxy mounted under a prefix.
    base_path: String,
    model_id: String,
    timeout: Duration,
}

impl FoundationModelClient {
    pub fn new(
        credentials: AwsCredentials,
        region: impl Into<String>,
        endpoint: impl Into<String>,
        model_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let endpoint: String = endpoint.into();
        let endpoint = endpoint.trim_end_matches('/').to_string();

        let url = reqwest::Url::parse(&endpoint)
            .map_err(|e| DomainError::config(format!("invalid endpoint '{}': {}", endpoint, e)))?;
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{}:{}", h, p),
            (Some(h), None) => h.to_string(),
            (None, _) => {
                return Err(DomainError::config(format!(
                    "endpoint '{}' has no host",
                    endpoint
                )))
            }
        };

        if url.query().is_some() || url.fragment().is_some() {
            return Err(DomainError::config(format!(
                "endpoint '{}' must not carry a query or fragment",
                endpoint
            )));
        }
        let base_path = url.path().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            signer: SigV4Signer::new(credentials, region, SIGNING_SERVICE),
            endpoint: format!("{}://{}", url.scheme(), host),
            host,
            base_path,
            model_id: model_id.into(),
            timeout,
        })
    }

    /// Full request path; this exact string is both requested and signed.
    fn invoke_path(&self) -> String {
        format!(
            "{}/model/{}/invoke",
            self.base_path,
            uri_encode_segment(&self.model_id)
        )
    }
}

#[async_trait]
impl ModelClient for FoundationModelClient {
    async fn invoke(&self, prompt: &str) -> Result<ModelEnvelope, DomainError> {
        let body = serde_json::to_vec(&InvokeRequest { input_text: prompt })
            .map_err(|e| DomainError::invalid_input(format!("failed to encode request: {}", e)))?;

        let path = self.invoke_path();
        let signed = self.signer.sign(
            "POST",
            &self.host,
            &path,
            &[("content-type", "application/json")],
            &body,
            Utc::now(),
        );

        debug!(
            "POST {}{} (model={}, region={})",
            self.endpoint,
            path,
            self.model_id,
            self.signer.region()
        );

        let mut request = self
            .client
            .post(format!("{}{}", self.endpoint, path))
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .body(body);
        for (name, value) in signed {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::network(
                    SERVICE_NAME,
                    format!("request timed out after {}s", self.timeout.as_secs()),
                )
            } else {
                DomainError::network(SERVICE_NAME, format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::network(SERVICE_NAME, format!("failed to read body: {}", e)))?;

        if !status.is_success() {
            warn!("{} returned {}: {}", SERVICE_NAME, status, text);
            return Err(DomainError::network(
                SERVICE_NAME,
                format!("endpoint returned {}{}", status, error_message(&text)),
            ));
        }

        parse_envelope(&text)
    }

    fn service_name(&self) -> &str {
        SERVICE_NAME
    }
}

/// Any JSON object is a structurally valid envelope; anything else is malformed.
pub fn parse_envelope(body: &str) -> Result<ModelEnvelope, DomainError> {
    serde_json::from_str(body)
        .map_err(|e| DomainError::malformed(format!("reply is not a JSON object: {}", e)))
}

/// `": <message>"` when the error body carries a `message`/`Message` field.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(|m| m.as_str())
                .map(|m| format!(": {}", m))
        })
        .unwrap_or_default()
}
