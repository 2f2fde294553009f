//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::state::ChatSession;
use crate::inference::{ApiErrorKind, ApiKey, CompletionProvider, RequestContext};

/// A provider that replays canned results in order and records every request.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, ApiErrorKind>>>,
    requests: Mutex<Vec<RequestContext>>,
}

impl ScriptedProvider {
    pub fn new(replies: impl IntoIterator<Item = Result<String, ApiErrorKind>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RequestContext> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: RequestContext) -> Result<String, ApiErrorKind> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ApiErrorKind::Protocol))
    }
}

/// Creates a test session with a 40-column display.
pub fn test_session() -> ChatSession {
    ChatSession::new(ApiKey::new("test-key"), "Be brief.", "test-model", 40)
}

#[tokio::test]
async fn scripted_provider_replays_in_order() {
    let provider = ScriptedProvider::new([Ok("one".to_string()), Err(ApiErrorKind::Network)]);
    let request = RequestContext {
        system_instructions: String::new(),
        history: Vec::new(),
        user_text: "hi".to_string(),
        api_key: ApiKey::new("k"),
    };

    assert_eq!(provider.complete(request.clone()).await, Ok("one".to_string()));
    assert_eq!(provider.complete(request.clone()).await, Err(ApiErrorKind::Network));
    assert_eq!(provider.complete(request).await, Err(ApiErrorKind::Protocol));
    assert_eq!(provider.requests().len(), 3);
}
