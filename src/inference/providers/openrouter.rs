//! OpenRouter provider using the OpenAI-compatible Chat Completions API.
//!
//! Non-streaming: one POST to `/chat/completions`, one JSON reply.
//! The system preamble is sent as the leading `system` message.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_TIMEOUT, http_client, post_json};
use crate::core::history::Role as TurnRole;
use crate::inference::{ApiErrorKind, CompletionProvider, RequestContext};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash-lite";

// ============================================================================
// Chat Completions API Types
// ============================================================================

/// Role in a chat message (OpenAI terminology)
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Debug, Clone)]
struct ChatMessage {
    role: Role,
    content: String,
}

/// The request body for Chat Completions
#[derive(Serialize, Debug)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize, Debug)]
struct ReplyMessage {
    content: Option<String>,
}

// ============================================================================
// Translation Layer
// ============================================================================

/// Converts a request context into the chat messages array.
///
/// Merged same-role runs are joined with newlines, since a chat message has a
/// single content string.
fn context_to_messages(request: &RequestContext) -> Vec<ChatMessage> {
    let system = ChatMessage {
        role: Role::System,
        content: request.system_instructions.clone(),
    };

    std::iter::once(system)
        .chain(request.alternating_turns().into_iter().map(|turn| ChatMessage {
            role: match turn.role {
                TurnRole::User => Role::User,
                TurnRole::Assistant => Role::Assistant,
            },
            content: turn.joined(),
        }))
        .collect()
}

fn parse_reply(body: &str) -> Result<String, ApiErrorKind> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| {
        warn!("OpenRouter response parse error: {}", e);
        ApiErrorKind::Protocol
    })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| {
            warn!("OpenRouter response had no message content");
            ApiErrorKind::Protocol
        })
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// OpenRouter API provider
pub struct OpenRouterProvider {
    base_url: String,
    model: String,
    max_output_tokens: u32,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Creates a new OpenRouter provider.
    ///
    /// # Arguments
    /// * `model` - OpenRouter model slug
    /// * `base_url` - Optional custom base URL (defaults to OpenRouter's API)
    /// * `max_output_tokens` - Sent as `max_tokens`
    /// * `timeout` - Optional request timeout (defaults to 30s)
    pub fn new(
        model: String,
        base_url: Option<String>,
        max_output_tokens: u32,
        timeout: Option<Duration>,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            max_output_tokens,
            client: http_client(timeout.unwrap_or(DEFAULT_TIMEOUT))?,
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: RequestContext) -> Result<String, ApiErrorKind> {
        let chat_request = ChatRequest {
            model: self.model.clone(),
            messages: context_to_messages(&request),
            max_tokens: self.max_output_tokens,
        };
        debug!(
            "OpenRouter request: model={}, message_count={}",
            self.model,
            chat_request.messages.len()
        );

        let json_body = serde_json::to_string(&chat_request).map_err(|e| {
            warn!("OpenRouter request serialization failed: {}", e);
            ApiErrorKind::Protocol
        })?;

        let http_request = self
            .client
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", request.api_key.expose()));

        let response_body = post_json(self.name(), http_request, json_body).await?;
        parse_reply(&response_body)
    }
}
