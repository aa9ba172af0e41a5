use tracing::debug;

use crate::domain::DomainError;

use super::IntentDetector;

pub const DEFAULT_MIN_INPUT_CHARS: usize = 10;
pub const DEFAULT_MAX_INPUT_CHARS: usize = 4000;

/// Shown instead of a model answer when the request is too thin to act on.
pub const VALIDATION_MESSAGE: &str =
    "Please provide a more detailed requirement, such as a user story or email template request.";

/// Cleans user input and rejects it before any network call when it cannot be used.
pub struct InputValidator {
    min_chars: usize,
    max_chars: usize,
    require_keywords: bool,
    detector: IntentDetector,
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INPUT_CHARS, DEFAULT_MAX_INPUT_CHARS)
    }
}

impl InputValidator {
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
            require_keywords: false,
            detector: IntentDetector::new(),
        }
    }

    /// Also reject text that hits neither the user-story nor the email keywords.
    pub fn with_required_keywords(mut self, required: bool) -> Self {
        self.require_keywords = required;
        self
    }

    /// Normalizes line endings, drops control characters other than newline and
    /// tab, and trims surrounding whitespace.
    pub fn sanitize(input: &str) -> String {
        input
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Returns the sanitized text, or the error whose message is shown to the user.
    pub fn validate(&self, input: &str) -> Result<String, DomainError> {
        let cleaned = Self::sanitize(input);
        let len = cleaned.chars().count();

        if len < self.min_chars {
            debug!("Rejecting input of {} chars (minimum {})", len, self.min_chars);
            return Err(DomainError::empty_input(VALIDATION_MESSAGE));
        }

        if len > self.max_chars {
            debug!("Rejecting input of {} chars (maximum {})", len, self.max_chars);
            return Err(DomainError::input_too_long(format!(
                "Your request is too long. Please keep it under {} characters.",
                self.max_chars
            )));
        }

        if self.require_keywords && !self.detector.has_keyword(&cleaned) {
            debug!("Rejecting input without a user-story or email keyword");
            return Err(DomainError::empty_input(VALIDATION_MESSAGE));
        }

        Ok(cleaned)
    }

    /// The text shown in the chat for a validation failure.
    pub fn rejection_message(err: &DomainError) -> String {
        match err {
            DomainError::EmptyInput(msg) | DomainError::InputTooLong(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
