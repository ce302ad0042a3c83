/*
[INPUT]:  Error sources (HTTP transport, parsing, session invalidation)
[OUTPUT]: Structured error types distinguishing "server said no" from "couldn't talk to the server"
[POS]:    Error handling layer - unified error types for the entire crate
[UPDATE]: When adding new error sources or changing user-facing copy
*/

use thiserror::Error;

/// Generic copy shown for any failure without a server-provided message.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Main error type for the Signal Trace auth client.
///
/// Envelope-level failures (`success = false`) are NOT errors; they come back
/// as `Ok(ApiEnvelope)` so callers can bind field errors to forms. An `Err`
/// here means the request never produced a usable envelope, or the session
/// was invalidated by the centralized 401 interceptor.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No HTTP response at all (DNS, connect, timeout, ...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Session rejected by the server; local tokens have been cleared
    #[error("session is no longer valid, please sign in again")]
    Unauthorized,

    /// Response body was not a valid envelope
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// URL construction failed
    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuthError {
    /// Check if the error means the server was unreachable.
    pub fn is_transport(&self) -> bool {
        matches!(self, AuthError::Transport(_))
    }

    /// Check if the error indicates an invalidated session.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AuthError::Unauthorized)
    }

    /// User-displayable message for this error.
    ///
    /// Transport and parse failures collapse to the generic retry-later copy;
    /// only the session-invalid case carries its own wording.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::Unauthorized => "Your session has expired. Please sign in again.",
            _ => GENERIC_ERROR_MESSAGE,
        }
    }
}

/// Result type alias for auth client operations.
pub type Result<T> = std::result::Result<T, AuthError>;
