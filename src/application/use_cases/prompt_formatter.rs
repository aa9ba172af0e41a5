use tracing::debug;

use crate::domain::{Intent, TaskLabel, Turn};

use super::IntentDetector;

pub const DEFAULT_MAX_PROMPT_CHARS: usize = 12_000;

/// Cue appended after a serialized conversation so the model answers as the assistant.
pub const ASSISTANT_CUE: &str = "BA Genie:";

pub const USER_STORY_PREAMBLE: &str = "\
Generate a detailed user story with the following format:
User Story for E-commerce Website Login Page
Title: Existing Customer Login to Access Profile
As an existing customer, I want to log into the e-commerce website, so that access my profile and manage my account details.
Acceptance Criteria:
1. Login Form: The login page should have both email and password fields, along with a submit button.
2. Input Validation: Ensure users receive an error for incorrect email or password. Validate email format.
3. Forgot Password Option: Provide a link to initiate password recovery.
4. Session Management: Users should stay logged in unless they explicitly log out.
5. Redirect on Successful Login: After login, users should be redirected to their profile or last visited page.
6. Access Control: Users must log in before accessing any account-related features.
7. Responsive Design: Ensure login works seamlessly on both desktop and mobile.
8. Security Measures: Implement CAPTCHA after multiple login attempts, and ensure secure password handling.";

pub const EMAIL_PREAMBLE: &str = "Write a formal email based on the following details:";

pub const GENERAL_PREAMBLE: &str = "\
You are BA Genie, an assistant for business analysts. \
Answer the following request clearly and concisely:";

/// Builds the single outbound prompt string for one turn.
///
/// Template selection, in order:
/// 1. a task label gives `"{label}: {text}"`;
/// 2. non-empty history gives the transcript form ending in [`ASSISTANT_CUE`];
/// 3. otherwise the detected intent picks a preamble: `"{preamble}\n\n{text}"`.
///
/// The output depends only on the inputs, so the same history always serializes
/// to the same bytes.
pub struct PromptFormatter {
    detector: IntentDetector,
    max_chars: usize,
}

impl Default for PromptFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptFormatter {
    pub fn new() -> Self {
        Self {
            detector: IntentDetector::new(),
            max_chars: DEFAULT_MAX_PROMPT_CHARS,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars.max(1);
        self
    }

    /// Most characters any template adds around the user's text. A prompt built
    /// from `n` characters of input is never longer than `n + template_overhead()`,
    /// history form aside.
    pub fn template_overhead() -> usize {
        let preamble = [USER_STORY_PREAMBLE, EMAIL_PREAMBLE, GENERAL_PREAMBLE]
            .iter()
            .map(|p| p.chars().count() + 2)
            .max()
            .unwrap_or(0);
        let label = TaskLabel::ALL
            .iter()
            .map(|l| l.as_str().chars().count() + 2)
            .max()
            .unwrap_or(0);
        let conversation =
            Turn::user("").to_prompt_line().chars().count() + ASSISTANT_CUE.chars().count();
        preamble.max(label).max(conversation)
    }

    pub fn preamble(intent: Intent) -> &'static str {
        match intent {
            Intent::UserStory => USER_STORY_PREAMBLE,
            Intent::EmailTemplate => EMAIL_PREAMBLE,
            Intent::General => GENERAL_PREAMBLE,
        }
    }

    pub fn format(&self, task: Option<TaskLabel>, text: &str, history: Option<&[Turn]>) -> String {
        if let Some(label) = task {
            return Self::format_task(label, text);
        }

        match history {
            Some(turns) if turns.iter().any(|t| !t.is_rejected()) => {
                self.format_conversation(turns, text)
            }
            _ => self.format_intent(self.detector.detect(text), text),
        }
    }

    pub fn format_task(label: TaskLabel, text: &str) -> String {
        format!("{}: {}", label.as_str(), text)
    }

    pub fn format_intent(&self, intent: Intent, text: &str) -> String {
        format!("{}\n\n{}", Self::preamble(intent), text)
    }

    /// Transcript form. Rejected turns are skipped. Oldest prior turns are dropped
    /// whole until the prompt fits `max_chars`; the current turn is always kept.
    pub fn format_conversation(&self, history: &[Turn], text: &str) -> String {
        let current = Turn::user(text).to_prompt_line();
        let lines: Vec<String> = history
            .iter()
            .filter(|t| !t.is_rejected())
            .map(Turn::to_prompt_line)
            .collect();

        let fixed = current.chars().count() + ASSISTANT_CUE.chars().count();
        let mut total: usize = fixed + lines.iter().map(|l| l.chars().count()).sum::<usize>();
        let mut start = 0;
        while total > self.max_chars && start < lines.len() {
            total -= lines[start].chars().count();
            start += 1;
        }
        if start > 0 {
            debug!(
                "Dropped {} oldest turns to keep prompt under {} chars",
                start, self.max_chars
            );
        }

        let mut prompt = String::with_capacity(total);
        for line in &lines[start..] {
            prompt.push_str(line);
        }
        prompt.push_str(&current);
        prompt.push_str(ASSISTANT_CUE);
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_label_prefixes_verbatim_text() {
        let formatter = PromptFormatter::new();
        for label in TaskLabel::ALL {
            let text = "  keep   THIS  exactly ";
            let prompt = formatter.format(Some(label), text, None);
            assert_eq!(prompt, format!("{}: {}", label.as_str(), text));
        }
    }

    #[test]
    fn task_label_takes_precedence_over_history() {
        let history = vec![Turn::user("earlier"), Turn::assistant("reply")];
        let prompt = PromptFormatter::new().format(
            Some(TaskLabel::Summarize),
            "this paragraph",
            Some(&history),
        );
        assert_eq!(prompt, "Summarize: this paragraph");
    }

    #[test]
    fn intent_preamble_without_label_or_history() {
        let prompt = PromptFormatter::new().format(None, "email the team about the outage", None);
        assert_eq!(
            prompt,
            format!("{}\n\n{}", EMAIL_PREAMBLE, "email the team about the outage")
        );
    }

    #[test]
    fn empty_history_uses_preamble() {
        let prompt = PromptFormatter::new().format(None, "what is a backlog?", Some(&[]));
        assert!(prompt.starts_with(GENERAL_PREAMBLE));
    }

    #[test]
    fn user_story_preamble_has_eight_criteria() {
        let prompt = PromptFormatter::new().format(None, "Generate a user story for login", None);
        assert!(prompt.contains("E-commerce Website Login Page"));
        for n in 1..=8 {
            assert!(prompt.contains(&format!("\n{}. ", n)), "missing criterion {}", n);
        }
        assert!(!prompt.contains("\n9. "));
        assert!(prompt.ends_with("\n\nGenerate a user story for login"));
    }

    #[test]
    fn conversation_serializes_turns_in_order() {
        let history = vec![Turn::user("hi"), Turn::assistant("hello")];
        let prompt = PromptFormatter::new().format(None, "next", Some(&history));
        assert_eq!(prompt, "User: hi\nAssistant: hello\nUser: next\nBA Genie:");
    }

    #[test]
    fn conversation_is_idempotent() {
        let history = vec![
            Turn::user("first question"),
            Turn::assistant("first answer\nwith two lines"),
        ];
        let formatter = PromptFormatter::new();
        let a = formatter.format(None, "second", Some(&history));
        let b = formatter.format(None, "second", Some(&history));
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn oldest_turns_are_dropped_to_fit() {
        let history = vec![
            Turn::user("aaaaaaaaaa"),
            Turn::assistant("bbbbbbbbbb"),
            Turn::user("cc"),
        ];
        // "User: cc\n" (9) + "User: now\n" (10) + cue (9) = 28
        let prompt = PromptFormatter::new()
            .with_max_chars(30)
            .format(None, "now", Some(&history));
        assert_eq!(prompt, "User: cc\nUser: now\nBA Genie:");
    }

    #[test]
    fn rejected_turns_never_reach_the_prompt() {
        let history = vec![
            Turn::user("hi").into_rejected(),
            Turn::assistant("Please say more.").into_rejected(),
            Turn::user("real question").into_rejected(),
        ];
        let prompt = PromptFormatter::new().format(None, "what is a backlog?", Some(&history));
        assert_eq!(prompt, format!("{}\n\n{}", GENERAL_PREAMBLE, "what is a backlog?"));

        let history = vec![
            Turn::user("hi").into_rejected(),
            Turn::assistant("Please say more.").into_rejected(),
            Turn::user("first question"),
            Turn::assistant("first answer"),
        ];
        let prompt = PromptFormatter::new().format(None, "next", Some(&history));
        assert_eq!(
            prompt,
            "User: first question\nAssistant: first answer\nUser: next\nBA Genie:"
        );
    }

    #[test]
    fn every_template_stays_within_overhead() {
        let formatter = PromptFormatter::new();
        let text = "Generate a user story for login";
        let budget = text.chars().count() + PromptFormatter::template_overhead();

        for label in TaskLabel::ALL {
            assert!(formatter.format(Some(label), text, None).chars().count() <= budget);
        }
        for intent in [Intent::UserStory, Intent::EmailTemplate, Intent::General] {
            assert!(formatter.format_intent(intent, text).chars().count() <= budget);
        }
        assert_eq!(
            formatter.format_intent(Intent::UserStory, text).chars().count(),
            budget
        );
    }

    #[test]
    fn current_turn_survives_tiny_limit() {
        let history = vec![Turn::user("old")];
        let prompt = PromptFormatter::new()
            .with_max_chars(1)
            .format(None, "current", Some(&history));
        assert_eq!(prompt, "User: current\nBA Genie:");
    }
}
