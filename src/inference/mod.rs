pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{ApiErrorKind, CompletionProvider};
pub use providers::{GeminiProvider, OpenRouterProvider};
pub use types::{ApiKey, DEFAULT_SYSTEM_PROMPT, MergedTurn, RequestContext};
