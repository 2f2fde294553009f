//! # Actions
//!
//! Everything that can happen in a session becomes an `Action`.
//! User presses a key? That's `Action::Key(key)`.
//! API responds? That's `Action::ResponseReady(result)`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state and returns an `Effect` telling the host what I/O to do next. No side
//! effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Submission protocol:
//!
//! ```text
//! Key(Submit) ─► append user turn ─► SpawnRequest(ctx), is_loading = true
//!                                          │
//!             ResponseReady(Ok(reply)) ◄───┤  append assistant turn, clear banner
//!             ResponseReady(Err(kind)) ◄───┘  banner = kind.banner(), history untouched
//! ```

use log::{debug, info, warn};

use crate::core::history::Turn;
use crate::core::input::{InputEvent, Key};
use crate::core::state::ChatSession;
use crate::inference::{ApiErrorKind, RequestContext};

/// Banner shown while a request is in flight.
pub const THINKING_BANNER: &str = "Thinking...";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Key(Key),
    ResponseReady(Result<String, ApiErrorKind>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Redraw,
    /// Run the request on a worker and send back `Action::ResponseReady`.
    SpawnRequest(RequestContext),
    Quit,
}

pub fn update(session: &mut ChatSession, action: Action) -> Effect {
    match action {
        Action::Key(key) => handle_key(session, key),
        Action::ResponseReady(result) => handle_response(session, result),
    }
}

fn handle_key(session: &mut ChatSession, key: Key) -> Effect {
    if session.is_loading {
        // The request can't be aborted; quit once it lands.
        if key == Key::Cancel {
            info!("Cancel during request, exiting after response");
            session.quit_requested = true;
        }
        return Effect::None;
    }

    match session.input.handle(key) {
        None => Effect::None,
        Some(InputEvent::ContentChanged) => Effect::Redraw,
        Some(InputEvent::Cancel) => {
            info!("Session cancelled by user");
            Effect::Quit
        }
        Some(InputEvent::Submit(text)) => submit(session, text),
    }
}

fn submit(session: &mut ChatSession, text: String) -> Effect {
    session.history.append(Turn::user(text.clone()));
    // Taken after the append so eviction applies; the new turn travels as user_text.
    let mut history = session.history.snapshot();
    history.pop();

    let request = RequestContext {
        system_instructions: session.system_prompt.clone(),
        history,
        user_text: text,
        api_key: session.api_key.clone(),
    };

    info!(
        "Submitting message: {} chars, {} prior turns",
        request.user_text.chars().count(),
        request.history.len()
    );
    session.is_loading = true;
    session.banner = Some(THINKING_BANNER.to_string());
    Effect::SpawnRequest(request)
}

fn handle_response(session: &mut ChatSession, result: Result<String, ApiErrorKind>) -> Effect {
    if !session.is_loading {
        warn!("Response arrived with no request in flight, ignoring");
        return Effect::None;
    }
    session.is_loading = false;

    match result {
        Ok(reply) => {
            debug!("Reply received: {} chars", reply.chars().count());
            session.history.append(Turn::assistant(reply));
            session.banner = None;
        }
        Err(kind) => {
            warn!("Exchange failed: {}", kind);
            session.banner = Some(kind.banner().to_string());
        }
    }

    if session.quit_requested {
        Effect::Quit
    } else {
        Effect::Redraw
    }
}
