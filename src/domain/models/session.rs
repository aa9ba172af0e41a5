use uuid::Uuid;

use super::{Role, Turn};

/// The conversation held for one chat session.
///
/// Owned by the caller: created when a session starts, passed by `&mut` into the
/// chat use case for each turn, and dropped (or cleared) when the session ends.
/// Turns are append-only while the session is live.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: String,
    turns: Vec<Turn>,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            turns: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Turn::assistant(content));
    }

    /// Records an exchange whose input failed validation. Both turns stay in the
    /// session but are left out of any prompt.
    pub fn push_rejected(&mut self, input: impl Into<String>, message: impl Into<String>) {
        self.push(Turn::user(input).into_rejected());
        self.push(Turn::assistant(message).into_rejected());
    }

    pub fn last_assistant(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.role() == Role::Assistant)
    }

    /// Ends the conversation; the session keeps its id.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
