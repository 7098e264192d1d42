use serde::{Deserialize, Serialize};

/// A login session. Both tokens of a pair carry its id; revoking the
/// session invalidates both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session id (UUIDv4, no dashes).
    pub id: String,

    /// User id that owns this session.
    pub user_id: String,

    /// RFC 3339 timestamp when the token pair was issued.
    pub issued_at: String,

    /// RFC 3339 timestamp when the refresh token expires.
    pub expires_at: String,

    /// Whether this session has been revoked.
    #[serde(default)]
    pub revoked: bool,
}

/// Access + refresh token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}
