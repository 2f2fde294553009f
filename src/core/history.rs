//! # Conversation History
//!
//! Bounded, chronological log of conversation turns. This is the context the
//! model sees on every request, so it is capped to keep request payloads small.
//!
//! ```text
//! cap = 2 exchanges (4 turns)
//!
//! [U1 A1 U2 A2] + U3  →  [U2 A2 U3]       oldest exchange evicted whole
//! [U2 A2 U3]    + A3  →  [U2 A2 U3 A3]
//! ```
//!
//! Eviction removes the oldest user turn together with the assistant turn
//! that answered it, so the history never starts with an orphaned reply.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of user/assistant exchanges kept as context.
pub const DEFAULT_MAX_EXCHANGES: usize = 5;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Bounded FIFO of turns.
#[derive(Debug, Clone)]
pub struct History {
    turns: VecDeque<Turn>,
    max_turns: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_max_exchanges(DEFAULT_MAX_EXCHANGES)
    }
}

impl History {
    /// Creates an empty history holding at most `max_exchanges` user/assistant
    /// pairs. Zero is clamped to one.
    pub fn with_max_exchanges(max_exchanges: usize) -> Self {
        let max_turns = max_exchanges.max(1) * 2;
        Self {
            turns: VecDeque::with_capacity(max_turns + 1),
            max_turns,
        }
    }

    /// Appends a turn, evicting the oldest exchange(s) until the cap holds.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);

        while self.turns.len() > self.max_turns {
            let Some(evicted) = self.turns.pop_front() else {
                break;
            };
            if evicted.role == Role::User
                && self.turns.front().is_some_and(|t| t.role == Role::Assistant)
            {
                self.turns.pop_front();
            }
        }
    }

    /// Owned copy of the current turns, oldest first.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.back()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }
}
