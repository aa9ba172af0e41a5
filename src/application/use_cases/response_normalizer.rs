use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{DomainError, Intent, ModelEnvelope, TaskLabel};

/// Rendered in place of an answer when the reply lacks `results[0].outputText`.
pub const MALFORMED_RESPONSE_SENTINEL: &str = "No valid response was received from the model.";

/// How a failed model call is turned into chat content. Failed calls are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Canned answer for the task; error text when the task has none.
    #[default]
    Canned,
    /// Always show the error text.
    Error,
}

impl FromStr for FallbackPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "canned" => Ok(FallbackPolicy::Canned),
            "error" => Ok(FallbackPolicy::Error),
            other => Err(DomainError::invalid_input(format!(
                "unknown fallback policy '{}', expected canned or error",
                other
            ))),
        }
    }
}

const GRAMMAR_CHECK_FALLBACK: &str = "\
I couldn't reach the language model to check your grammar right now.
Meanwhile, a quick checklist:
1. Make sure each sentence has a subject and a verb.
2. Keep tenses consistent within a paragraph.
3. Check subject-verb agreement (\"the team is\", \"the users are\").
4. Watch for missing commas after introductory phrases.";

const PARAPHRASE_FALLBACK: &str = "\
I couldn't reach the language model to paraphrase your text right now.
Try restating the main idea in one sentence, replacing jargon with plain words, \
and splitting long sentences in two.";

const SUMMARIZE_FALLBACK: &str = "\
I couldn't reach the language model to summarize your text right now.
A summary usually answers: What is the goal? Who is affected? \
What are the key decisions and next steps?";

const USER_STORY_FALLBACK: &str = "\
User Story: <Feature name>
Title: <Short descriptive title>
As a <type of user>, I want to <perform some action>, so that <I achieve some goal>.
Acceptance Criteria:
1. <Condition that must be met>
2. <Validation or error behaviour>
3. <Non-functional requirement, e.g. performance or security>";

const EMAIL_FALLBACK: &str = "\
Subject: <Subject line>

Dear <Recipient>,

I hope this message finds you well. I am writing regarding <topic>.

<Main details of the request or update>

Please let me know if you have any questions.

Best regards,
<Your name>";

/// Extracts the answer from a model reply and resolves failures into chat text.
pub struct ResponseNormalizer {
    policy: FallbackPolicy,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new(FallbackPolicy::default())
    }
}

impl ResponseNormalizer {
    pub fn new(policy: FallbackPolicy) -> Self {
        Self { policy }
    }

    /// The trimmed `outputText` of the first result. Blank text counts as malformed.
    pub fn normalize(&self, envelope: &ModelEnvelope) -> Result<String, DomainError> {
        let results = envelope
            .results
            .as_ref()
            .ok_or_else(|| DomainError::malformed("reply has no 'results' list"))?;

        let first = results
            .first()
            .ok_or_else(|| DomainError::malformed("reply has an empty 'results' list"))?;

        let text = first
            .output_text
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| DomainError::malformed("first result has no 'outputText'"))?;

        if text.is_empty() {
            return Err(DomainError::malformed("first result has a blank 'outputText'"));
        }
        Ok(text.to_string())
    }

    /// Canned answer keyed by the task label, or by the detected intent when no
    /// label was selected.
    pub fn fallback_template(task: Option<TaskLabel>, intent: Intent) -> Option<&'static str> {
        match task {
            Some(TaskLabel::GrammarCheck) => Some(GRAMMAR_CHECK_FALLBACK),
            Some(TaskLabel::Paraphrase) => Some(PARAPHRASE_FALLBACK),
            Some(TaskLabel::Summarize) => Some(SUMMARIZE_FALLBACK),
            Some(TaskLabel::GenerateUserStory) => Some(USER_STORY_FALLBACK),
            Some(TaskLabel::GenerateEmail) => Some(EMAIL_FALLBACK),
            None => match intent {
                Intent::UserStory => Some(USER_STORY_FALLBACK),
                Intent::EmailTemplate => Some(EMAIL_FALLBACK),
                Intent::General => None,
            },
        }
    }

    /// User-visible text for a model failure.
    pub fn error_text(err: &DomainError) -> String {
        match err {
            DomainError::MalformedResponse(_) => MALFORMED_RESPONSE_SENTINEL.to_string(),
            other => other.to_string(),
        }
    }

    pub fn resolve_failure(
        &self,
        err: &DomainError,
        task: Option<TaskLabel>,
        intent: Intent,
    ) -> String {
        warn!("Model call failed: {}", err);
        match self.policy {
            FallbackPolicy::Canned => Self::fallback_template(task, intent)
                .map(str::to_string)
                .unwrap_or_else(|| Self::error_text(err)),
            FallbackPolicy::Error => Self::error_text(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> ModelEnvelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn trims_first_output() {
        let normalizer = ResponseNormalizer::default();
        let text = normalizer
            .normalize(&envelope(r#"{"results":[{"outputText":"  hi  "},{"outputText":"no"}]}"#))
            .unwrap();
        assert_eq!(text, "hi");
    }

    #[test]
    fn empty_or_missing_results_are_malformed() {
        let normalizer = ResponseNormalizer::default();
        for json in [
            r#"{"results":[]}"#,
            "{}",
            r#"{"results":[{"tokenCount":3}]}"#,
            r#"{"results":[{"outputText":" \n\t "}]}"#,
        ] {
            let err = normalizer.normalize(&envelope(json)).unwrap_err();
            assert!(matches!(err, DomainError::MalformedResponse(_)), "{}", json);
        }
    }

    #[test]
    fn canned_policy_uses_task_template() {
        let normalizer = ResponseNormalizer::new(FallbackPolicy::Canned);
        let err = DomainError::malformed("empty");
        let text = normalizer.resolve_failure(&err, Some(TaskLabel::GenerateEmail), Intent::General);
        assert!(text.starts_with("Subject: "));

        let text = normalizer.resolve_failure(&err, None, Intent::UserStory);
        assert!(text.starts_with("User Story: "));
    }

    #[test]
    fn every_task_has_a_template() {
        for label in TaskLabel::ALL {
            assert!(ResponseNormalizer::fallback_template(Some(label), Intent::General).is_some());
        }
    }

    #[test]
    fn general_intent_falls_through_to_error_text() {
        let normalizer = ResponseNormalizer::new(FallbackPolicy::Canned);
        let err = DomainError::network("Bedrock", "timed out");
        assert_eq!(
            normalizer.resolve_failure(&err, None, Intent::General),
            "Error invoking Bedrock: timed out"
        );
        assert_eq!(
            normalizer.resolve_failure(&DomainError::malformed("x"), None, Intent::General),
            MALFORMED_RESPONSE_SENTINEL
        );
    }

    #[test]
    fn error_policy_ignores_templates() {
        let normalizer = ResponseNormalizer::new(FallbackPolicy::Error);
        let err = DomainError::network("Completions", "503");
        assert_eq!(
            normalizer.resolve_failure(&err, Some(TaskLabel::Summarize), Intent::General),
            "Error invoking Completions: 503"
        );
    }
}
