use std::fmt;

use async_trait::async_trait;

use super::types::RequestContext;

/// Why a single exchange with the model failed.
///
/// None of the variants carry request data, so they are safe to show and log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Transport failure: unreachable host, DNS, timeout, dropped connection.
    Network,
    /// Credential rejected.
    Auth,
    /// Remote rejected the payload (4xx other than auth).
    MalformedRequest { status: u16 },
    /// Remote internal failure (5xx).
    Server { status: u16 },
    /// Response body didn't match the expected schema.
    Protocol,
}

impl ApiErrorKind {
    /// One-line message for the display banner.
    pub fn banner(&self) -> &'static str {
        match self {
            ApiErrorKind::Network => "Network problem. Check Wi-Fi.",
            ApiErrorKind::Auth => "API key rejected. Check config.",
            ApiErrorKind::MalformedRequest { .. } => "Request refused. Try shorter.",
            ApiErrorKind::Server { .. } => "Server error. Try again later.",
            ApiErrorKind::Protocol => "Bad API response.",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network error"),
            ApiErrorKind::Auth => write!(f, "authentication error"),
            ApiErrorKind::MalformedRequest { status } => {
                write!(f, "malformed request (HTTP {status})")
            }
            ApiErrorKind::Server { status } => write!(f, "server error (HTTP {status})"),
            ApiErrorKind::Protocol => write!(f, "protocol error: unexpected response body"),
        }
    }
}

impl std::error::Error for ApiErrorKind {}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends one request and returns the model's reply text.
    ///
    /// Exactly one network call per invocation; retrying is the caller's call.
    async fn complete(&self, request: RequestContext) -> Result<String, ApiErrorKind>;
}
