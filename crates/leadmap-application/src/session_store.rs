//! Session store: who is signed in and whether they may use the dashboard.
//!
//! The store resolves the current session and its profile at start, then
//! re-resolves on every auth event. State is published through a
//! `tokio::sync::watch` channel; the access gate is derived from it.
//!
//! Resolution is bounded: if it has not finished when the resolution timeout
//! fires, `loading` is forced off so the host never waits forever. A profile
//! that cannot be fetched degrades to an unauthorized synthetic profile.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use leadmap_core::auth::{
    AuthEvent, AuthService, AuthSession, AuthUser, Credentials, Profile, ProfileRepository,
    SignUpOutcome, SignUpRequest,
};
use leadmap_core::config::AuthConfig;
use leadmap_core::error::Result;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::access::AccessGate;
use crate::subscription::Subscription;

/// Observable state of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// True until the first resolution finishes or the timeout fires
    pub loading: bool,
    pub session: Option<AuthSession>,
    pub profile: Option<Profile>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            loading: true,
            session: None,
            profile: None,
        }
    }
}

impl SessionSnapshot {
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            return SessionPhase::Initializing;
        }
        let Some(session) = &self.session else {
            return SessionPhase::Unauthenticated;
        };
        match &self.profile {
            Some(profile) if profile.authorized && profile.id == session.user.id => {
                SessionPhase::Authorized
            }
            _ => SessionPhase::Unauthorized,
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|session| &session.user)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Initializing,
    Unauthenticated,
    /// Signed in without an authorized profile
    Unauthorized,
    Authorized,
}

pub struct SessionStore {
    auth: Arc<dyn AuthService>,
    profiles: Arc<dyn ProfileRepository>,
    state: watch::Sender<SessionSnapshot>,
    /// Bumped by every resolution and sign-out; only the latest may write
    generation: AtomicU64,
    min_password_len: usize,
    token: CancellationToken,
}

impl SessionStore {
    pub fn new(
        auth: Arc<dyn AuthService>,
        profiles: Arc<dyn ProfileRepository>,
        config: &AuthConfig,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            auth,
            profiles,
            state,
            generation: AtomicU64::new(0),
            min_password_len: config.min_password_len,
            token: CancellationToken::new(),
        }
    }

    /// Creates the store and starts resolution, the auth-event listener and
    /// the resolution timeout.
    ///
    /// Close the returned subscription on teardown.
    pub fn start(
        auth: Arc<dyn AuthService>,
        profiles: Arc<dyn ProfileRepository>,
        config: &AuthConfig,
    ) -> (Arc<Self>, Subscription) {
        let store = Arc::new(Self::new(auth, profiles, config));
        let mut subscription = Subscription::new(store.token.clone());

        // Subscribe before resolving so no event is missed
        let events = store.auth.subscribe();
        subscription.push(tokio::spawn(Arc::clone(&store).listen(events)));

        let init = Arc::clone(&store);
        subscription.push(tokio::spawn(async move {
            tokio::select! {
                _ = init.token.cancelled() => {}
                _ = init.initialize() => {}
            }
        }));

        let timer = Arc::clone(&store);
        let timeout = config.resolution_timeout();
        subscription.push(tokio::spawn(async move {
            tokio::select! {
                _ = timer.token.cancelled() => {}
                _ = tokio::time::sleep(timeout) => timer.force_loaded(timeout),
            }
        }));

        tracing::info!("[SessionStore] Started");
        (store, subscription)
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    pub fn gate(&self) -> AccessGate {
        AccessGate::evaluate(&self.state.borrow())
    }

    /// Resolves the backend's current session.
    pub async fn initialize(&self) {
        let session = match self.auth.get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("[SessionStore] Could not read current session: {}", e);
                None
            }
        };
        self.resolve(session).await;
    }

    /// Signs in. Failures are returned as-is; map them with `Notice::sign_in_failed`.
    ///
    /// State changes arrive through the auth-event listener.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        let credentials = Credentials::new(email, password);
        credentials.validate()?;

        match self.auth.sign_in(&credentials).await {
            Ok(session) => {
                tracing::info!("[SessionStore] Signed in user {}", session.user.id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("[SessionStore] Sign-in rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Creates an account, then stores the display name on its profile.
    ///
    /// The name update is best effort; its failure is logged, not returned.
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<SignUpOutcome> {
        let request = SignUpRequest::new(email, password, name);
        request.validate(self.min_password_len)?;

        let outcome = self.auth.sign_up(&request).await.inspect_err(|e| {
            tracing::warn!("[SessionStore] Sign-up failed: {}", e);
        })?;

        if let Some(user) = &outcome.user
            && !request.display_name.is_empty()
            && let Err(e) = self
                .profiles
                .update_name(&user.id, &request.display_name)
                .await
        {
            tracing::warn!(
                "[SessionStore] Could not store display name for {}: {}",
                user.id,
                e
            );
        }

        Ok(outcome)
    }

    /// Signs out. Local state is cleared whatever the backend answers.
    pub async fn sign_out(&self) -> Result<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let remote = self.auth.sign_out().await;
        if let Err(e) = &remote {
            tracing::warn!("[SessionStore] Remote sign-out failed: {}", e);
        }

        self.apply(|state| {
            state.session = None;
            state.profile = None;
            state.loading = false;
        });
        tracing::info!("[SessionStore] Signed out");
        remote
    }

    async fn listen(self: Arc<Self>, mut events: broadcast::Receiver<AuthEvent>) {
        loop {
            let received = tokio::select! {
                _ = self.token.cancelled() => break,
                received = events.recv() => received,
            };

            match received {
                Ok(event) => {
                    tracing::debug!("[SessionStore] Auth event {:?}", event.kind);
                    let store = Arc::clone(&self);
                    let token = self.token.clone();
                    // Resolve off the listener so a slow profile fetch does not
                    // hold back later events
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = token.cancelled() => {}
                            _ = store.resolve(event.session) => {}
                        }
                    });
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("[SessionStore] Missed {} auth events, re-reading session", skipped);
                    let store = Arc::clone(&self);
                    tokio::spawn(async move { store.initialize().await });
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    async fn resolve(&self, session: Option<AuthSession>) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // The identity is published before its profile, so a profile that
        // never arrives still leaves the gate on "no access". A profile is
        // kept only while it belongs to the same user.
        if let Some(early) = &session {
            let early = early.clone();
            self.apply_if_current(generation, |state| {
                if state
                    .profile
                    .as_ref()
                    .is_some_and(|profile| profile.id != early.user.id)
                {
                    state.profile = None;
                }
                state.session = Some(early);
            });
        }

        let profile = match &session {
            Some(session) => Some(self.load_profile(&session.user).await),
            None => None,
        };

        self.apply_if_current(generation, |state| {
            state.session = session;
            state.profile = profile;
            state.loading = false;
        });
    }

    async fn load_profile(&self, user: &AuthUser) -> Profile {
        match self.profiles.find_by_id(&user.id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::warn!("[SessionStore] No profile for user {}", user.id);
                Profile::unauthorized(user)
            }
            Err(e) => {
                tracing::warn!("[SessionStore] Profile fetch failed for {}: {}", user.id, e);
                Profile::unauthorized(user)
            }
        }
    }

    fn force_loaded(&self, timeout: Duration) {
        self.apply(|state| {
            if state.loading {
                tracing::warn!(
                    "[SessionStore] Resolution not finished after {:?}, showing current state",
                    timeout
                );
                state.loading = false;
            }
        });
    }

    fn apply_if_current<F>(&self, generation: u64, update: F)
    where
        F: FnOnce(&mut SessionSnapshot),
    {
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("[SessionStore] Dropping superseded resolution");
            return;
        }
        self.apply(update);
    }

    fn apply<F>(&self, update: F)
    where
        F: FnOnce(&mut SessionSnapshot),
    {
        if self.token.is_cancelled() {
            return;
        }
        self.state.send_if_modified(|state| {
            let before = state.clone();
            update(state);
            *state != before
        });
    }
}
