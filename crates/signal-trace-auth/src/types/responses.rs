/*
[INPUT]:  Envelope `data` payloads returned by the auth endpoints
[OUTPUT]: Typed Rust response structs
[POS]:    Data layer - inbound wire shapes
[UPDATE]: When an endpoint's response contract changes
*/

use serde::{Deserialize, Serialize};

/// Account fields returned by login and profile endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Server-formatted timestamp; kept opaque for display.
    #[serde(default)]
    pub date_joined: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// Access/refresh pair as the server sends it under `data.tokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokensData {
    pub access: String,
    pub refresh: String,
}

/// `data` for `POST /api/auth/login/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    pub user: AuthUser,
    pub tokens: TokensData,
}

/// `data` for `POST /api/auth/signup/`.
///
/// Tokens are present only when the server logs the account in immediately;
/// otherwise the account awaits OTP verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupData {
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub tokens: Option<TokensData>,
}

/// `data` for the OTP verification endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpVerifyData {
    #[serde(default)]
    pub tokens: Option<TokensData>,
}

/// `data` for `GET /api/auth/profile/` and `PUT /api/auth/profile/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    pub user: AuthUser,
}
