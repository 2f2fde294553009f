//! # Render Model
//!
//! A plain-data snapshot of what the screen should show, derived from the
//! session on demand. Every line is already wrapped to the display width, so a
//! drawing adapter only has to place strings on rows.
//!
//! ```text
//! ┌────────────────────────────┐
//! │Model: gemini-2.5-flash-lite│  title
//! │You: hi                     │
//! │Bot: Hello! How are you     │  chat_lines (bottom-anchored)
//! │today?                      │
//! │Thinking...                 │  banner
//! │> what is a                 │  input_lines
//! └────────────────────────────┘
//! ```

use crate::core::history::{History, Role};
use crate::core::layout::wrap;

pub const USER_PREFIX: &str = "You: ";
pub const ASSISTANT_PREFIX: &str = "Bot: ";
pub const INPUT_PROMPT: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    pub title: String,
    pub chat_lines: Vec<String>,
    pub input_lines: Vec<String>,
    pub banner: Option<String>,
}

impl RenderModel {
    pub fn build(
        history: &History,
        pending_input: &str,
        banner: Option<&str>,
        model_label: &str,
        columns: usize,
    ) -> Self {
        let chat_lines = history
            .iter()
            .flat_map(|turn| {
                let prefix = match turn.role() {
                    Role::User => USER_PREFIX,
                    Role::Assistant => ASSISTANT_PREFIX,
                };
                wrap(&format!("{prefix}{}", turn.text()), columns)
            })
            .collect();

        Self {
            title: wrap(&format!("Model: {model_label}"), columns)
                .into_iter()
                .next()
                .unwrap_or_default(),
            chat_lines,
            input_lines: wrap(&format!("{INPUT_PROMPT}{pending_input}"), columns),
            banner: banner.map(str::to_string),
        }
    }

    /// The slice of chat lines a viewport of `rows` lines shows.
    ///
    /// Anchored to the newest line; `scroll_back` moves the window up and is
    /// clamped so the window never runs past the oldest line.
    pub fn visible_chat(&self, rows: usize, scroll_back: usize) -> &[String] {
        let total = self.chat_lines.len();
        if rows == 0 || total == 0 {
            return &[];
        }
        let max_scroll = total.saturating_sub(rows);
        let end = total - scroll_back.min(max_scroll);
        let start = end.saturating_sub(rows);
        &self.chat_lines[start..end]
    }

    /// Largest useful `scroll_back` for a viewport of `rows` lines.
    pub fn max_scroll_back(&self, rows: usize) -> usize {
        self.chat_lines.len().saturating_sub(rows)
    }
}
