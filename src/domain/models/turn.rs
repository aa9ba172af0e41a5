use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Capitalized form used when a turn is serialized into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
    /// Part of an exchange whose input failed validation. Kept for display,
    /// never serialized into a prompt.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    rejected: bool,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            rejected: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn into_rejected(mut self) -> Self {
        self.rejected = true;
        self
    }

    pub fn is_rejected(&self) -> bool {
        self.rejected
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// `"{Role}: {content}\n"`
    pub fn to_prompt_line(&self) -> String {
        format!("{}: {}\n", self.role.label(), self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_line_capitalizes_role() {
        assert_eq!(Turn::user("hello").to_prompt_line(), "User: hello\n");
        assert_eq!(
            Turn::assistant("hi there").to_prompt_line(),
            "Assistant: hi there\n"
        );
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::user("x")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"x"}"#);
    }

    #[test]
    fn rejected_flag_round_trips() {
        let turn = Turn::user("too short").into_rejected();
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"too short","rejected":true}"#);
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert!(back.is_rejected());
    }
}
