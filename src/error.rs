// Client error types
use serde_json::Value;

use crate::auth::TokenError;

/// Coarse classification used by the screens to pick a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Token could not be decoded; role routing is blocked
    MalformedToken,
    /// Non-2xx answer or transport failure; the action is abandoned
    Network,
    /// Caught locally before any request went out
    Validation,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // Local failures, no request sent
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("Malformed token: {0}")]
    MalformedToken(#[from] TokenError),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // 4xx
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Any other non-2xx
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // Transport
    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    /// Build the error for a non-2xx response from its status and raw body
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unexpected status")
                .to_string()
        });

        match status {
            400 => ClientError::BadRequest(message),
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            _ => ClientError::Http { status, message },
        }
    }

    /// HTTP status when the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::BadRequest(_) => Some(400),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Conflict(_) => Some(409),
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::MalformedToken(_) => "MALFORMED_TOKEN",
            ClientError::InvalidUrl(_) => "INVALID_URL",
            ClientError::BadRequest(_) => "BAD_REQUEST",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Forbidden(_) => "FORBIDDEN",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::Conflict(_) => "CONFLICT",
            ClientError::Http { .. } => "HTTP_ERROR",
            ClientError::Timeout => "TIMEOUT",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::InvalidResponse(_) => "INVALID_RESPONSE",
        }
    }

    /// Message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            ClientError::Validation(m)
            | ClientError::BadRequest(m)
            | ClientError::Unauthorized(m)
            | ClientError::Forbidden(m)
            | ClientError::NotFound(m)
            | ClientError::Conflict(m) => m.clone(),
            ClientError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::MalformedToken(_) => ErrorKind::MalformedToken,
            ClientError::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Network,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_status(status.as_u16(), "")
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidResponse(err.to_string())
    }
}

/// Pull a human message out of an error body: `message`, then `error`, then
/// the raw text when it is short.
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                return Some(msg.to_string());
            }
        }
        if let Some(msg) = value.as_str() {
            return Some(msg.to_string());
        }
        return None;
    }

    if body.len() <= 200 {
        Some(body.to_string())
    } else {
        None
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
