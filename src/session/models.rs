//! Session data models.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// The normalized signed-in user, persisted under `current_user`.
///
/// Auth backend responses carry the id as `_id`; the alias lets the same
/// shape parse both the remote payload and our own persisted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserProfile {
    /// Minimal profile used when no remote profile can be fetched.
    pub fn minimal(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
        }
    }
}

/// Registration payload sent to the auth backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Token pair returned by sign-in and sign-up.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Who owns this tab right now.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(UserProfile),
}

#[derive(Deserialize)]
struct TokenClaims {
    #[serde(rename = "_id")]
    id: Option<String>,
    sub: Option<String>,
}

/// Extracts the identity claim (`_id`, falling back to `sub`) from a JWT
/// access token without verifying its signature. Returns None for anything
/// that does not look like a JWT.
pub fn decode_identity(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    claims.id.or(claims.sub)
}
