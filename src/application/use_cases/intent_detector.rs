use crate::domain::Intent;

/// Phrases that mark a request for a user story. Checked before the email set.
pub const USER_STORY_KEYWORDS: &[&str] = &[
    "user story",
    "acceptance criteria",
    "feature",
    "as a",
    "so that",
];

/// Phrases that mark a request for an email.
pub const EMAIL_KEYWORDS: &[&str] = &["email", "subject", "greeting", "template"];

/// Ordered rule list mapping free text to an [`Intent`].
///
/// A purely lexical switch: the text is lowercased and checked for any keyword of
/// each rule in turn. The first rule with a hit wins, so a request mentioning
/// both a user story and an email is a user story. No hit gives [`Intent::General`].
pub struct IntentDetector {
    rules: Vec<(Intent, &'static [&'static str])>,
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentDetector {
    pub fn new() -> Self {
        Self {
            rules: vec![
                (Intent::UserStory, USER_STORY_KEYWORDS),
                (Intent::EmailTemplate, EMAIL_KEYWORDS),
            ],
        }
    }

    pub fn detect(&self, text: &str) -> Intent {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::General)
    }

    /// True when the text hits any rule; used by the strict input check.
    pub fn has_keyword(&self, text: &str) -> bool {
        self.detect(text) != Intent::General
    }
}
