//! # Session State
//!
//! Core business state for one chat session. Domain data only, no terminal
//! types. Presentation state (scroll position) lives in the `tui` module.
//!
//! ```text
//! ChatSession
//! ├── history: History            // bounded user/assistant turns
//! ├── input: InputController      // pending line being typed
//! ├── banner: Option<String>      // status or error line
//! ├── is_loading: bool            // waiting for the API
//! ├── quit_requested: bool        // cancel pressed mid-request
//! ├── system_prompt: String       // preamble sent with every request
//! ├── api_key: ApiKey             // credential, never logged
//! ├── display_columns: usize      // wrap width
//! └── model_label: String         // shown in the title line
//! ```
//!
//! State changes only happen through `update(session, action)` in action.rs.

use crate::core::config::{Credentials, ResolvedConfig};
use crate::core::history::History;
use crate::core::input::InputController;
use crate::core::render::RenderModel;
use crate::inference::ApiKey;

pub struct ChatSession {
    pub history: History,
    pub input: InputController,
    pub banner: Option<String>,
    pub is_loading: bool,
    pub quit_requested: bool,
    pub system_prompt: String,
    pub api_key: ApiKey,
    pub display_columns: usize,
    pub model_label: String,
}

impl ChatSession {
    /// A session with default history and input limits.
    pub fn new(
        api_key: ApiKey,
        system_prompt: impl Into<String>,
        model_label: impl Into<String>,
        display_columns: usize,
    ) -> Self {
        Self {
            history: History::default(),
            input: InputController::default(),
            banner: None,
            is_loading: false,
            quit_requested: false,
            system_prompt: system_prompt.into(),
            api_key,
            display_columns: display_columns.max(1),
            model_label: model_label.into(),
        }
    }

    pub fn from_config(config: &ResolvedConfig, credentials: &Credentials) -> Self {
        let mut session = Self::new(
            credentials.api_key.clone(),
            config.system_prompt.clone(),
            config.model_name.clone(),
            // Two columns go to the border.
            usize::from(config.display_columns.saturating_sub(2)),
        );
        session.history = History::with_max_exchanges(config.max_exchanges);
        session.input = InputController::new(config.max_message_chars);
        session
    }

    pub fn render_model(&self) -> RenderModel {
        RenderModel::build(
            &self.history,
            self.input.pending(),
            self.banner.as_deref(),
            &self.model_label,
            self.display_columns,
        )
    }
}
