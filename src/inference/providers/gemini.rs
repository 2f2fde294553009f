//! Gemini provider using the non-streaming `generateContent` endpoint.
//!
//! This module uses Gemini terminology:
//! - "contents" (array of turns, not "history")
//! - "model" role (not "assistant")
//! - "systemInstruction" carried outside the contents array
//!
//! The key travels in the `x-goog-api-key` header, never in the URL.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_TIMEOUT, http_client, post_json};
use crate::core::history::Role;
use crate::inference::{ApiErrorKind, CompletionProvider, RequestContext};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
enum GeminiRole {
    User,
    Model,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct Part {
    text: String,
}

#[derive(Serialize, Debug)]
struct Content {
    role: GeminiRole,
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

/// The request body for `generateContent`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

/// Response-side part. Parts like `functionCall` carry no text.
#[derive(Deserialize, Debug)]
struct ReplyPart {
    text: Option<String>,
}

// ============================================================================
// Translation Layer
// ============================================================================

fn to_gemini_role(role: Role) -> GeminiRole {
    match role {
        Role::User => GeminiRole::User,
        Role::Assistant => GeminiRole::Model,
    }
}

/// Converts a request context into the `generateContent` body.
///
/// Merged turns keep one part per stored turn.
fn build_request(request: &RequestContext, max_output_tokens: u32) -> GenerateContentRequest {
    let contents = request
        .alternating_turns()
        .into_iter()
        .map(|turn| Content {
            role: to_gemini_role(turn.role),
            parts: turn
                .parts
                .into_iter()
                .map(|text| Part {
                    text: text.to_string(),
                })
                .collect(),
        })
        .collect();

    GenerateContentRequest {
        system_instruction: SystemInstruction {
            parts: vec![Part {
                text: request.system_instructions.clone(),
            }],
        },
        contents,
        generation_config: GenerationConfig { max_output_tokens },
    }
}

/// Pulls the reply text out of a success body.
///
/// The first candidate's text parts are concatenated. No candidates, no
/// content, or no text at all is a protocol error.
fn parse_reply(body: &str) -> Result<String, ApiErrorKind> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        warn!("Gemini response parse error: {}", e);
        ApiErrorKind::Protocol
    })?;

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
    if texts.is_empty() {
        warn!("Gemini response had no candidate text");
        return Err(ApiErrorKind::Protocol);
    }

    Ok(texts.concat())
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct GeminiProvider {
    base_url: String,
    model: String,
    max_output_tokens: u32,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// # Arguments
    /// * `model` - Model name, e.g. `gemini-2.5-flash-lite`
    /// * `base_url` - Optional custom base URL (defaults to the public v1beta API)
    /// * `max_output_tokens` - Generation cap sent with every request
    /// * `timeout` - Optional request timeout (defaults to 30s)
    ///
    /// Fails if the HTTP client can't be built with that timeout.
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

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: RequestContext) -> Result<String, ApiErrorKind> {
        let body = build_request(&request, self.max_output_tokens);
        debug!(
            "Gemini request: model={}, contents={}",
            self.model,
            body.contents.len()
        );

        let json_body = serde_json::to_string(&body).map_err(|e| {
            warn!("Gemini request serialization failed: {}", e);
            ApiErrorKind::Protocol
        })?;

        let http_request = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", request.api_key.expose());

        let response_body = post_json(self.name(), http_request, json_body).await?;
        parse_reply(&response_body)
    }
}
