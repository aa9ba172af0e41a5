use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::ModelClient;
use crate::domain::{ConversationSession, Intent, TaskLabel};

use super::{InputValidator, IntentDetector, PromptFormatter, ResponseNormalizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The model answered and the answer was normalized.
    Generated,
    /// The model call failed; the reply is a canned template or error text.
    Fallback,
    /// The input failed validation; no model call was made.
    Rejected,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    content: String,
    outcome: ReplyOutcome,
    intent: Option<Intent>,
}

impl ChatReply {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn outcome(&self) -> ReplyOutcome {
        self.outcome
    }

    /// Detected intent; `None` when a task label was selected or the input was rejected.
    pub fn intent(&self) -> Option<Intent> {
        self.intent
    }
}

/// One user turn through the pipeline: validate, pick a template, call the model
/// once, normalize, and record both turns in the caller's session.
///
/// Never fails: validation and model errors come back as chat content.
pub struct ChatUseCase {
    client: Arc<dyn ModelClient>,
    validator: InputValidator,
    detector: IntentDetector,
    formatter: PromptFormatter,
    normalizer: ResponseNormalizer,
    include_history: bool,
}

impl ChatUseCase {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            validator: InputValidator::default(),
            detector: IntentDetector::new(),
            formatter: PromptFormatter::new(),
            normalizer: ResponseNormalizer::default(),
            include_history: false,
        }
    }

    pub fn with_validator(mut self, validator: InputValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_formatter(mut self, formatter: PromptFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_normalizer(mut self, normalizer: ResponseNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Send prior turns of the session along with the current one.
    pub fn with_history(mut self, include_history: bool) -> Self {
        self.include_history = include_history;
        self
    }

    pub async fn execute(
        &self,
        session: &mut ConversationSession,
        input: &str,
        task: Option<TaskLabel>,
    ) -> ChatReply {
        let text = match self.validator.validate(input) {
            Ok(text) => text,
            Err(e) => {
                let message = InputValidator::rejection_message(&e);
                session.push_rejected(InputValidator::sanitize(input), message.clone());
                return ChatReply {
                    content: message,
                    outcome: ReplyOutcome::Rejected,
                    intent: None,
                };
            }
        };

        let intent = match task {
            Some(_) => None,
            None => Some(self.detector.detect(&text)),
        };

        let history = if self.include_history {
            Some(session.turns())
        } else {
            None
        };
        let prompt = self.formatter.format(task, &text, history);
        session.push_user(text);

        info!(
            "Session {}: invoking {} (task={}, intent={}, prompt_chars={})",
            session.id(),
            self.client.service_name(),
            task.map(|t| t.as_str()).unwrap_or("none"),
            intent.map(|i| i.as_str()).unwrap_or("n/a"),
            prompt.chars().count()
        );
        debug!("Prompt:\n{}", prompt);

        let start_time = Instant::now();
        let result = match self.client.invoke(&prompt).await {
            Ok(envelope) => self.normalizer.normalize(&envelope),
            Err(e) => Err(e),
        };
        info!(
            "Model call finished in {:.2}s",
            start_time.elapsed().as_secs_f64()
        );

        let (content, outcome) = match result {
            Ok(answer) => (answer, ReplyOutcome::Generated),
            Err(e) => (
                self.normalizer
                    .resolve_failure(&e, task, intent.unwrap_or(Intent::General)),
                ReplyOutcome::Fallback,
            ),
        };

        session.push_assistant(content.clone());

        ChatReply {
            content,
            outcome,
            intent,
        }
    }
}
