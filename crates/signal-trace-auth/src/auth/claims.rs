/*
[INPUT]:  A raw JWT access token
[OUTPUT]: Advisory claims (expiry, user id) from the unverified payload
[POS]:    Auth layer - token introspection, no signature verification
[UPDATE]: When the server adds claims worth surfacing
*/

use base64::{
    Engine as _,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::http::{AuthError, Result};

/// Claims the client cares about. Advisory only: the server remains the
/// authority on token validity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl TokenClaims {
    /// Expiry as a timestamp, if the token carries one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    /// Whether the token is past its expiry claim.
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(at) => Utc::now() >= at,
            None => false,
        }
    }
}

/// Decode the payload segment of a JWT without verifying its signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let payload_b64 = token
        .trim()
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::InvalidResponse("token is not a JWT".to_string()))?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .or_else(|_| URL_SAFE.decode(payload_b64))
        .map_err(|e| AuthError::InvalidResponse(format!("invalid JWT payload base64: {e}")))?;

    Ok(serde_json::from_slice(&payload_bytes)?)
}
