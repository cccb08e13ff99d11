//! Auth backend and profile store traits.

use super::model::{AuthEvent, AuthSession, Credentials, Profile, SignUpOutcome, SignUpRequest};
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Password-based authentication backed by the hosted auth service.
///
/// Implementations publish an `AuthEvent` for every session transition so that
/// observers (the session store) can re-resolve identity and profile.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Returns the current session, restoring or refreshing it if needed.
    ///
    /// `Ok(None)` means nobody is signed in.
    async fn get_session(&self) -> Result<Option<AuthSession>>;

    /// Signs in with email and password.
    ///
    /// Rejected credentials surface as `LeadmapError::Auth`.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession>;

    /// Creates an account.
    ///
    /// A duplicate account surfaces as `LeadmapError::Conflict`.
    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome>;

    /// Ends the current session. Local state is cleared even if the remote call fails.
    async fn sign_out(&self) -> Result<()>;

    /// Subscribes to auth-state changes.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Access to user profile rows.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds the profile of the given user.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Profile))`: Profile found
    /// - `Ok(None)`: No profile row for this user
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Updates the display name of the given user's profile.
    async fn update_name(&self, user_id: &str, display_name: &str) -> Result<()>;
}
