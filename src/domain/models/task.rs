use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// User-selected task that picks the prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskLabel {
    GrammarCheck,
    Paraphrase,
    Summarize,
    GenerateUserStory,
    GenerateEmail,
}

impl TaskLabel {
    pub const ALL: [TaskLabel; 5] = [
        TaskLabel::GrammarCheck,
        TaskLabel::Paraphrase,
        TaskLabel::Summarize,
        TaskLabel::GenerateUserStory,
        TaskLabel::GenerateEmail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskLabel::GrammarCheck => "Grammar Check",
            TaskLabel::Paraphrase => "Paraphrase",
            TaskLabel::Summarize => "Summarize",
            TaskLabel::GenerateUserStory => "Generate User Story",
            TaskLabel::GenerateEmail => "Generate Email",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            TaskLabel::GrammarCheck => "grammar-check",
            TaskLabel::Paraphrase => "paraphrase",
            TaskLabel::Summarize => "summarize",
            TaskLabel::GenerateUserStory => "generate-user-story",
            TaskLabel::GenerateEmail => "generate-email",
        }
    }
}

impl std::fmt::Display for TaskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskLabel {
    type Err = DomainError;

    /// Accepts the display form or the slug, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TaskLabel::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted) || t.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = TaskLabel::ALL.iter().map(|t| t.as_str()).collect();
                DomainError::invalid_input(format!(
                    "unknown task '{}', expected one of: {}",
                    wanted,
                    known.join(", ")
                ))
            })
    }
}

/// What the intent detector reads from free text when no task label is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    UserStory,
    EmailTemplate,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::UserStory => "User Story",
            Intent::EmailTemplate => "Email Template",
            Intent::General => "General",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
