//! # Core Application Logic
//!
//! The chat session's business logic. It knows nothing about any specific UI
//! technology and performs no network I/O.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • ChatSession (state)  │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • RenderModel          │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                   ┌────────────┴────────────┐
//!                   ▼                         ▼
//!            ┌────────────┐            ┌────────────┐
//!            │    TUI     │            │ inference  │
//!            │  Adapter   │            │ (provider  │
//!            │ (ratatui)  │            │   calls)   │
//!            └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `ChatSession`, all session state in one place
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`history`]: bounded user/assistant turn store
//! - [`input`]: single-line input controller
//! - [`layout`]: word wrap to the display width
//! - [`render`]: the wrapped, ready-to-draw screen model
//! - [`config`]: settings file, env and CLI resolution

pub mod action;
pub mod config;
pub mod history;
pub mod input;
pub mod layout;
pub mod render;
pub mod state;
