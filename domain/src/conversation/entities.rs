//! Conversation domain entities

use serde::{Deserialize, Serialize};

/// Identifier of a live conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for ConversationId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// Output produced by the model on the agent's behalf
    #[serde(alias = "assistant")]
    Agent,
    /// Result of a tool or command execution fed back into the conversation
    #[serde(alias = "environment")]
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
            Role::Tool => "tool",
        }
    }

    pub fn is_agent(&self) -> bool {
        matches!(self, Role::Agent)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single turn in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
        }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
        }
    }
}

/// Ordered, append-only conversation history.
///
/// Turn indices are positions in insertion order and never change once
/// assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) -> usize {
        self.turns.push(turn);
        self.turns.len() - 1
    }

    pub fn with_turn(mut self, turn: Turn) -> Self {
        self.turns.push(turn);
        self
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

    /// Index and turn of the most recent agent-authored turn.
    pub fn last_agent_turn(&self) -> Option<(usize, &Turn)> {
        self.turns
            .iter()
            .enumerate()
            .rev()
            .find(|(_, t)| t.role.is_agent())
    }

    pub fn has_agent_turns(&self) -> bool {
        self.turns.iter().any(|t| t.role.is_agent())
    }

    /// The first `len` turns as a new history.
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            turns: self.turns[..len.min(self.turns.len())].to_vec(),
        }
    }
}

impl From<Vec<Turn>> for ConversationHistory {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

impl FromIterator<Turn> for ConversationHistory {
    fn from_iter<I: IntoIterator<Item = Turn>>(iter: I) -> Self {
        Self {
            turns: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_agent_turn() {
        let history: ConversationHistory = vec![
            Turn::user("hello"),
            Turn::agent("first"),
            Turn::tool("ls output"),
            Turn::agent("second"),
            Turn::user("thanks"),
        ]
        .into();

        let (index, turn) = history.last_agent_turn().unwrap();
        assert_eq!(index, 3);
        assert_eq!(turn.content, "second");
    }

    #[test]
    fn test_last_agent_turn_absent() {
        let history: ConversationHistory = vec![Turn::user("User message")].into();
        assert!(history.last_agent_turn().is_none());
        assert!(!history.has_agent_turns());
        assert!(ConversationHistory::new().last_agent_turn().is_none());
    }

    #[test]
    fn test_push_returns_index() {
        let mut history = ConversationHistory::new();
        assert_eq!(history.push(Turn::user("a")), 0);
        assert_eq!(history.push(Turn::agent("b")), 1);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_prefix_clamps() {
        let history: ConversationHistory = vec![Turn::user("a"), Turn::agent("b")].into();
        assert_eq!(history.prefix(1).len(), 1);
        assert_eq!(history.prefix(10).len(), 2);
    }

    #[test]
    fn test_turn_serde_shape() {
        let turn: Turn = serde_json::from_str(r#"{"role":"agent","content":"hi"}"#).unwrap();
        assert_eq!(turn, Turn::agent("hi"));

        let history: ConversationHistory =
            serde_json::from_str(r#"[{"role":"user","content":"a"},{"role":"tool","content":"b"}]"#)
                .unwrap();
        assert_eq!(history.turns()[1].role, Role::Tool);
    }
}
