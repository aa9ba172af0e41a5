use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::application::{
    ChatUseCase, DocumentWriter, ExportResponseUseCase, InputValidator, ModelClient,
    PromptFormatter, ResponseNormalizer,
};
use crate::connector::adapter::{
    CompletionClient, DocxWriter, FoundationModelClient, MockModelClient, PlainTextWriter,
};
use crate::domain::DomainError;

use super::config::{AppConfig, Backend};

/// Wires the configured backend and writers into use cases.
///
/// Holds only stateless, shareable services; conversation state lives in the
/// caller's `ConversationSession`.
pub struct Container {
    model_client: Arc<dyn ModelClient>,
    writers: Vec<Arc<dyn DocumentWriter>>,
    config: AppConfig,
}

impl Container {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;

        let timeout = Duration::from_secs(config.timeout_secs);
        let model_client: Arc<dyn ModelClient> = match config.backend {
            Backend::Foundation => {
                let credentials = config.credentials().ok_or_else(|| {
                    DomainError::config("foundation backend needs AWS credentials")
                })?;
                let endpoint = config.resolved_endpoint();
                let model = config.resolved_model();
                info!("Using foundation model {} at {}", model, endpoint);
                Arc::new(FoundationModelClient::new(
                    credentials,
                    config.region.clone(),
                    endpoint,
                    model,
                    timeout,
                )?)
            }
            Backend::Completion => {
                let endpoint = config.resolved_endpoint();
                let model = config.resolved_model();
                info!("Using completion model {} at {}", model, endpoint);
                Arc::new(CompletionClient::new(
                    config.api_key.clone().unwrap_or_default(),
                    model,
                    endpoint,
                    timeout,
                )?)
            }
            Backend::Mock => {
                info!("Using mock model client");
                Arc::new(MockModelClient::new())
            }
        };

        debug!("Container configured: {:?}", config);

        Ok(Self::with_client(model_client, config))
    }

    /// Skips backend construction; used by tests and embedders with their own client.
    pub fn with_client(model_client: Arc<dyn ModelClient>, config: AppConfig) -> Self {
        Self {
            model_client,
            writers: vec![Arc::new(PlainTextWriter), Arc::new(DocxWriter)],
            config,
        }
    }

    pub fn chat_use_case(&self) -> ChatUseCase {
        let validator = InputValidator::new(self.config.min_input_chars, self.config.max_input_chars)
            .with_required_keywords(self.config.require_keywords);

        ChatUseCase::new(self.model_client.clone())
            .with_validator(validator)
            .with_formatter(PromptFormatter::new().with_max_chars(self.config.max_prompt_chars))
            .with_normalizer(ResponseNormalizer::new(self.config.fallback))
            .with_history(self.config.include_history)
    }

    pub fn export_use_case(&self) -> ExportResponseUseCase {
        ExportResponseUseCase::new(self.writers.clone())
    }

    pub fn service_name(&self) -> &str {
        self.model_client.service_name()
    }
}
