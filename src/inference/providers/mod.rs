//! Provider implementations and the HTTP plumbing they share.
//!
//! Both providers send one JSON POST per request and classify the outcome the
//! same way:
//!
//! ```text
//! transport failure / timeout / body read failure  →  Network
//! 401, 403, or 400 naming an invalid key           →  Auth
//! other 4xx                                        →  MalformedRequest
//! 5xx and anything else non-2xx                    →  Server
//! 2xx that doesn't parse                           →  Protocol (per provider)
//! ```

pub mod gemini;
pub mod openrouter;

pub use gemini::GeminiProvider;
pub use openrouter::OpenRouterProvider;

use std::time::Duration;

use log::{debug, info, warn};

use crate::inference::ApiErrorKind;

/// Default upper bound on a whole request, connect to last byte.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds an HTTP client with a bounded request timeout.
///
/// A client without the timeout is never handed out.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Markers some APIs put in a 400 body when the key itself is bad.
const INVALID_KEY_MARKERS: [&str; 2] = ["API_KEY_INVALID", "API key not valid"];

/// Maps a non-success HTTP status (and its error body) to an error kind.
pub(crate) fn classify_status(status: u16, body: &str) -> ApiErrorKind {
    match status {
        401 | 403 => ApiErrorKind::Auth,
        400..=499 if INVALID_KEY_MARKERS.iter().any(|m| body.contains(m)) => ApiErrorKind::Auth,
        400..=499 => ApiErrorKind::MalformedRequest { status },
        _ => ApiErrorKind::Server { status },
    }
}

/// Sends a prepared JSON request and returns the success body.
///
/// `provider` is only used for log lines. Error bodies are logged truncated;
/// the credential lives in a header and never appears here.
pub(crate) async fn post_json(
    provider: &str,
    request: reqwest::RequestBuilder,
    json_body: String,
) -> Result<String, ApiErrorKind> {
    info!("{} request: payload size {} bytes", provider, json_body.len());

    let response = request
        .header("Content-Type", "application/json")
        .body(json_body)
        .send()
        .await
        .map_err(|e| {
            warn!("{} transport error: {}", provider, e.without_url());
            ApiErrorKind::Network
        })?;

    let status = response.status();
    debug!("{} response status: {}", provider, status);

    let body = response.text().await.map_err(|e| {
        warn!("{} failed reading body: {}", provider, e.without_url());
        ApiErrorKind::Network
    })?;

    if !status.is_success() {
        let kind = classify_status(status.as_u16(), &body);
        warn!(
            "{} API error: {} - {}",
            provider,
            status.as_u16(),
            body.chars().take(120).collect::<String>()
        );
        return Err(kind);
    }

    Ok(body)
}
