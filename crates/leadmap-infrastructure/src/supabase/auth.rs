//! Password authentication against the hosted auth service.

use async_trait::async_trait;
use chrono::Utc;
use leadmap_core::auth::{
    AuthEvent, AuthEventKind, AuthService, AuthSession, AuthUser, Credentials, SignUpOutcome,
    SignUpRequest,
};
use leadmap_core::error::{LeadmapError, Result};
use leadmap_core::notice::ALREADY_REGISTERED_MARKER;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tokio::sync::broadcast;

use super::client::{SupabaseClient, error_message};
use crate::session_file::SessionFile;

const EVENT_CAPACITY: usize = 16;

/// Token grant as returned by the password and refresh flows.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now: i64) -> AuthSession {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| now + secs));
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_at,
            user: self.user,
        }
    }
}

/// Sign-up answers with a full session when accounts are confirmed
/// automatically, and with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(AuthUser),
}

/// `AuthService` over the hosted auth REST endpoints.
///
/// The current session lives in the shared `SupabaseClient`, so row-store
/// requests made afterwards carry the signed-in user's token. When a
/// `SessionFile` is attached the session also survives restarts.
pub struct GoTrueAuthService {
    client: SupabaseClient,
    events: broadcast::Sender<AuthEvent>,
    store: Option<SessionFile>,
}

impl GoTrueAuthService {
    pub fn new(client: SupabaseClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            events,
            store: None,
        }
    }

    /// Persists sessions to `store`.
    pub fn with_session_file(mut self, store: SessionFile) -> Self {
        self.store = Some(store);
        self
    }

    fn publish(&self, kind: AuthEventKind, session: Option<AuthSession>) {
        // No subscribers is not an error
        let _ = self.events.send(AuthEvent::new(kind, session));
    }

    async fn adopt(&self, session: AuthSession, kind: AuthEventKind) {
        self.client.set_session(Some(session.clone())).await;
        if let Some(store) = &self.store
            && let Err(e) = store.save(&session).await
        {
            tracing::warn!("[AuthService] Failed to persist session: {}", e);
        }
        self.publish(kind, Some(session));
    }

    async fn forget(&self) {
        self.client.set_session(None).await;
        if let Some(store) = &self.store
            && let Err(e) = store.clear().await
        {
            tracing::warn!("[AuthService] Failed to remove session file: {}", e);
        }
    }

    async fn grant(&self, grant_type: &str, body: serde_json::Value) -> Result<TokenResponse> {
        let url = self.client.auth_url("token");
        let request = self
            .client
            .request(Method::POST, &url)
            .await
            .query(&[("grant_type", grant_type)])
            .json(&body);
        let response = self.client.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let (_, message) = error_message(response).await;
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                    LeadmapError::auth(message)
                }
                _ => LeadmapError::http(status.as_u16(), message),
            });
        }

        Ok(response.json().await?)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession> {
        let tokens = self
            .grant(
                "refresh_token",
                serde_json::json!({ "refresh_token": refresh_token }),
            )
            .await?;
        Ok(tokens.into_session(Utc::now().timestamp()))
    }
}

#[async_trait]
impl AuthService for GoTrueAuthService {
    async fn get_session(&self) -> Result<Option<AuthSession>> {
        let mut session = self.client.current_session().await;
        let mut restored = false;
        if session.is_none()
            && let Some(store) = &self.store
        {
            session = store.load().await?;
            restored = session.is_some();
            if restored {
                tracing::debug!("[AuthService] Restored session from {:?}", store.path());
            }
        }

        let Some(session) = session else {
            return Ok(None);
        };

        if !session.is_expired() {
            self.client.set_session(Some(session.clone())).await;
            if restored {
                self.publish(AuthEventKind::InitialSession, Some(session.clone()));
            }
            return Ok(Some(session));
        }

        let Some(refresh_token) = session.refresh_token.clone() else {
            tracing::info!("[AuthService] Stored session expired without refresh token");
            self.forget().await;
            return Ok(None);
        };

        // Refresh with the anon key; the expired token would be rejected
        self.client.set_session(None).await;
        match self.refresh(&refresh_token).await {
            Ok(fresh) => {
                tracing::info!("[AuthService] Session refreshed");
                self.adopt(fresh.clone(), AuthEventKind::TokenRefreshed).await;
                Ok(Some(fresh))
            }
            Err(e) => {
                tracing::warn!("[AuthService] Session refresh failed: {}", e);
                self.forget().await;
                Ok(None)
            }
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession> {
        credentials.validate()?;
        let tokens = self
            .grant(
                "password",
                serde_json::json!({
                    "email": credentials.email,
                    "password": credentials.password,
                }),
            )
            .await?;

        let session = tokens.into_session(Utc::now().timestamp());
        tracing::info!("[AuthService] Signed in user {}", session.user.id);
        self.adopt(session.clone(), AuthEventKind::SignedIn).await;
        Ok(session)
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome> {
        let url = self.client.auth_url("signup");
        let body = serde_json::json!({
            "email": request.credentials.email,
            "password": request.credentials.password,
            "data": { "nome": request.display_name },
        });
        let http = self.client.request(Method::POST, &url).await.json(&body);
        let response = self.client.send(http).await?;

        let status = response.status();
        if !status.is_success() {
            let (_, message) = error_message(response).await;
            if message.to_lowercase().contains(ALREADY_REGISTERED_MARKER) {
                return Err(LeadmapError::conflict(message));
            }
            return Err(LeadmapError::http(status.as_u16(), message));
        }

        match response.json::<SignUpResponse>().await? {
            SignUpResponse::Session(tokens) => {
                let session = tokens.into_session(Utc::now().timestamp());
                tracing::info!("[AuthService] Signed up and signed in user {}", session.user.id);
                self.adopt(session.clone(), AuthEventKind::SignedIn).await;
                Ok(SignUpOutcome {
                    user: Some(session.user.clone()),
                    session: Some(session),
                })
            }
            SignUpResponse::User(user) => {
                tracing::info!("[AuthService] Signed up user {} (confirmation pending)", user.id);
                Ok(SignUpOutcome {
                    user: Some(user),
                    session: None,
                })
            }
        }
    }

    async fn sign_out(&self) -> Result<()> {
        let remote = match self.client.current_session().await {
            Some(_) => {
                let url = self.client.auth_url("logout");
                let request = self.client.request(Method::POST, &url).await;
                match self.client.send(request).await {
                    Ok(response) if response.status().is_success() => Ok(()),
                    Ok(response) => {
                        let (status, message) = error_message(response).await;
                        Err(LeadmapError::http(status.as_u16(), message))
                    }
                    Err(e) => Err(e),
                }
            }
            None => Ok(()),
        };

        if let Err(e) = &remote {
            tracing::warn!("[AuthService] Remote sign-out failed: {}", e);
        }

        self.forget().await;
        self.publish(AuthEventKind::SignedOut, None);
        remote
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_computes_expiry() {
        let tokens: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": { "id": "u1", "email": "ana@example.com", "aud": "authenticated" }
        }))
        .unwrap();
        let session = tokens.into_session(1_000);
        assert_eq!(session.expires_at, Some(4_600));
        assert_eq!(session.refresh_token.as_deref(), Some("r"));
    }

    #[test]
    fn test_sign_up_response_shapes() {
        let pending: SignUpResponse = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "ana@example.com",
            "confirmation_sent_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(matches!(pending, SignUpResponse::User(ref u) if u.id == "u1"));

        let confirmed: SignUpResponse = serde_json::from_value(serde_json::json!({
            "access_token": "jwt",
            "expires_at": 2_000_000_000i64,
            "user": { "id": "u1" }
        }))
        .unwrap();
        assert!(matches!(confirmed, SignUpResponse::Session(_)));
    }
}
