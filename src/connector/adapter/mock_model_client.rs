use async_trait::async_trait;
use tracing::debug;

use crate::application::ModelClient;
use crate::domain::{DomainError, ModelEnvelope};

/// Offline stand-in that answers with the prompt it was given.
///
/// Useful for trying templates without credentials: the assistant turn shows
/// exactly what would have been sent.
pub struct MockModelClient;

impl MockModelClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockModelClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn invoke(&self, prompt: &str) -> Result<ModelEnvelope, DomainError> {
        debug!("MockModelClient echoing {} chars", prompt.len());
        Ok(ModelEnvelope::from_text(prompt))
    }

    fn service_name(&self) -> &str {
        "mock model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_prompt() {
        let envelope = MockModelClient::new().invoke("Summarize: x").await.unwrap();
        assert_eq!(envelope.first_output(), Some("Summarize: x"));
    }
}
