//! Shared HTTP plumbing for the hosted backend.

use std::sync::Arc;

use leadmap_core::auth::AuthSession;
use leadmap_core::config::BackendConfig;
use leadmap_core::error::{LeadmapError, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tokio::sync::RwLock;

/// Connection to one backend project.
///
/// Cheap to clone; clones share the HTTP pool and the current session, so a
/// sign-in through the auth adapter authorizes the row-store adapters too.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        if config.url.trim().is_empty() || config.anon_key.trim().is_empty() {
            return Err(LeadmapError::config("backend url and anon key are required"));
        }
        Ok(Self::new(config.url.trim(), config.anon_key.trim()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub async fn current_session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }

    pub async fn set_session(&self, session: Option<AuthSession>) {
        *self.session.write().await = session;
    }

    /// Builds a request carrying the project key and the best available bearer token.
    pub async fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.anon_key.clone(),
        };

        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Sends a request, mapping transport failures to `LeadmapError::Network`.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| LeadmapError::network(format!("backend request failed: {e}")))
    }
}

/// Extracts a human-readable message from an error response.
///
/// The auth service and the row store use different shapes (`msg`,
/// `error_description`, `message`, `error`); the first non-empty one wins.
pub async fn error_message(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    (status, message_from_body(status, &body))
}

pub(crate) fn message_from_body(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let from_json = parsed.as_ref().and_then(|json| {
        ["msg", "message", "error_description", "error"]
            .iter()
            .filter_map(|key| json.get(key).and_then(Value::as_str))
            .map(str::trim)
            .find(|m| !m.is_empty())
            .map(str::to_string)
    });

    from_json.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    })
}
