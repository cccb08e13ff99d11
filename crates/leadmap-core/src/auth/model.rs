//! Authentication and profile models.

use crate::error::{LeadmapError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Minimum password length accepted at sign-up.
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 6;

/// Authenticated identity as reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// A live session: tokens plus the user they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Unix timestamp (seconds) after which the access token is rejected
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl AuthSession {
    /// Returns true when the access token has expired at `now` (unix seconds).
    ///
    /// Sessions without an expiry never expire locally; the backend is the
    /// final judge.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}

/// Per-user profile row holding the authorization flag.
///
/// The flag is flipped by an administrator outside this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "nome", default)]
    pub display_name: Option<String>,
    #[serde(rename = "autorizacao", default)]
    pub authorized: bool,
    #[serde(default)]
    pub created_at: String,
}

impl Profile {
    /// Synthetic profile used when the real one cannot be fetched.
    ///
    /// Always unauthorized: access stays closed while the UI stays responsive.
    pub fn unauthorized(user: &AuthUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: None,
            authorized: false,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Kind of auth-state transition published by the auth backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEventKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// Auth-state change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<AuthSession>,
}

impl AuthEvent {
    pub fn new(kind: AuthEventKind, session: Option<AuthSession>) -> Self {
        Self { kind, session }
    }

    pub fn signed_out() -> Self {
        Self::new(AuthEventKind::SignedOut, None)
    }
}

/// Email/password credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Rejects blank email or password.
    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() {
            return Err(LeadmapError::validation("email is required"));
        }
        if self.password.is_empty() {
            return Err(LeadmapError::validation("password is required"));
        }
        Ok(())
    }
}

/// Account creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub credentials: Credentials,
    pub display_name: String,
}

impl SignUpRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials::new(email, password),
            display_name: display_name.into().trim().to_string(),
        }
    }

    /// Validates the request locally, before any backend call.
    pub fn validate(&self, min_password_len: usize) -> Result<()> {
        self.credentials.validate()?;
        if self.credentials.password.chars().count() < min_password_len {
            return Err(LeadmapError::password_too_short(min_password_len));
        }
        Ok(())
    }
}

/// Result of a successful sign-up call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user: Option<AuthUser>,
    /// Present only when the backend confirms accounts automatically
    pub session: Option<AuthSession>,
}
