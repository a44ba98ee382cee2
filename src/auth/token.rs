use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::router::Role;

/// Base64url engine that accepts payload segments with or without `=` padding
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token has no payload segment")]
    MissingPayload,

    #[error("Token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Token payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Token payload is not a JSON object")]
    NotAnObject,
}

/// Claim set carried in the token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Raw `role` claim, if present and a string
    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(Value::as_str)
    }

    pub fn parsed_role(&self) -> Option<Role> {
        self.role().map(Role::from_wire)
    }

    /// Best-effort display name: `username`, then `sub`
    pub fn subject(&self) -> Option<&str> {
        self.0
            .get("username")
            .or_else(|| self.0.get("sub"))
            .and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Claims(map)
    }
}

/// Decode the payload segment of a compact token without verifying it.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let payload = token
        .trim()
        .split('.')
        .nth(1)
        .ok_or(TokenError::MissingPayload)?;

    // Tolerate payloads emitted with the standard alphabet
    let normalized: String = payload
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = PAYLOAD_ENGINE.decode(normalized.as_bytes())?;
    let text = String::from_utf8(bytes)?;

    match serde_json::from_str::<Value>(&text)? {
        Value::Object(map) => {
            tracing::trace!("decoded token payload with {} claims", map.len());
            Ok(Claims(map))
        }
        _ => Err(TokenError::NotAnObject),
    }
}
