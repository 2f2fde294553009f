//! # Input Controller
//!
//! Turns raw key events into the pending message.
//!
//! ## Responsibilities
//!
//! - Append printable characters (bounded by `max_chars`)
//! - Remove the last character on backspace
//! - Hand the message over on submit and reset the buffer
//! - Report cancel upward without acting on it
//!
//! The controller knows nothing about history, the network, or rendering.

/// Default cap on a single message, in characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 200;

/// Discrete key events delivered by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Backspace,
    Submit,
    Cancel,
}

/// High-level events emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The pending text changed
    ContentChanged,
    /// The user submitted this message; the buffer is now empty
    Submit(String),
    /// The user asked to leave
    Cancel,
}

#[derive(Debug, Clone)]
pub struct InputController {
    buffer: String,
    max_chars: usize,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE_CHARS)
    }
}

impl InputController {
    pub fn new(max_chars: usize) -> Self {
        Self {
            buffer: String::new(),
            max_chars,
        }
    }

    /// Text typed so far.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Handle one key. Returns `None` when the key had no effect.
    pub fn handle(&mut self, key: Key) -> Option<InputEvent> {
        match key {
            Key::Character(c) => {
                if c.is_control() || self.buffer.chars().count() >= self.max_chars {
                    return None;
                }
                self.buffer.push(c);
                Some(InputEvent::ContentChanged)
            }
            Key::Backspace => self
                .buffer
                .pop()
                .map(|_| InputEvent::ContentChanged),
            Key::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                Some(InputEvent::Submit(std::mem::take(&mut self.buffer)))
            }
            Key::Cancel => Some(InputEvent::Cancel),
        }
    }
}
