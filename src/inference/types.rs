use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::history::{Role, Turn};

/// Default system preamble: child-friendly, one or two short sentences.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and friendly assistant for children aged 10-12, \
    running on a very small handheld device with a tiny screen. \
    Use simple language and explain things clearly. \
    Answer in one or two short sentences.";

/// The model API credential.
///
/// `Debug` is redacted so the key can't end up in logs by accident.
/// Use [`ApiKey::expose`] only where the key is attached to a request.
#[derive(Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Everything a provider needs for one request. Built fresh per submission
/// and moved into the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub system_instructions: String,
    /// Prior turns, oldest first. Does not include `user_text`.
    pub history: Vec<Turn>,
    pub user_text: String,
    pub api_key: ApiKey,
}

/// A run of same-role turns collapsed into one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTurn<'a> {
    pub role: Role,
    pub parts: Vec<&'a str>,
}

impl MergedTurn<'_> {
    pub fn joined(&self) -> String {
        self.parts.join("\n")
    }
}

impl RequestContext {
    /// History plus the new user text as strictly alternating turns.
    ///
    /// Failed exchanges leave consecutive user turns behind; those are merged
    /// (in order) into a single user turn. The new user text always lands in
    /// the final user turn.
    pub fn alternating_turns(&self) -> Vec<MergedTurn<'_>> {
        let mut merged: Vec<MergedTurn<'_>> = Vec::with_capacity(self.history.len() + 1);
        let all = self
            .history
            .iter()
            .map(|t| (t.role(), t.text()))
            .chain(std::iter::once((Role::User, self.user_text.as_str())));

        for (role, text) in all {
            match merged.last_mut() {
                Some(last) if last.role == role => last.parts.push(text),
                _ => merged.push(MergedTurn {
                    role,
                    parts: vec![text],
                }),
            }
        }
        merged
    }
}
