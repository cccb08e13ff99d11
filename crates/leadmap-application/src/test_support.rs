//! Hand-written collaborators for the store tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use leadmap_core::auth::{
    AuthEvent, AuthEventKind, AuthService, AuthSession, AuthUser, Credentials, Profile,
    ProfileRepository, SignUpOutcome, SignUpRequest,
};
use leadmap_core::automation::{AutomationRequest, AutomationTrigger};
use leadmap_core::error::{LeadmapError, Result};
use leadmap_core::lead::{Lead, LeadRepository};
use tokio::sync::{broadcast, oneshot};

pub fn session_for(user_id: &str, email: &str) -> AuthSession {
    AuthSession {
        access_token: format!("jwt-{user_id}"),
        refresh_token: Some("refresh".to_string()),
        token_type: "bearer".to_string(),
        expires_at: None,
        user: AuthUser {
            id: user_id.to_string(),
            email: Some(email.to_string()),
        },
    }
}

pub fn profile(user_id: &str, authorized: bool) -> Profile {
    Profile {
        id: user_id.to_string(),
        email: None,
        display_name: None,
        authorized,
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

// Auth backend that accepts any password except when told otherwise
pub struct MockAuthService {
    session: Mutex<Option<AuthSession>>,
    events: broadcast::Sender<AuthEvent>,
    pub sign_in_error: Mutex<Option<LeadmapError>>,
    pub sign_up_error: Mutex<Option<LeadmapError>>,
    pub sign_out_error: Mutex<Option<LeadmapError>>,
    pub sign_up_calls: Mutex<Vec<SignUpRequest>>,
}

impl MockAuthService {
    pub fn new(session: Option<AuthSession>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            session: Mutex::new(session),
            events,
            sign_in_error: Mutex::new(None),
            sign_up_error: Mutex::new(None),
            sign_out_error: Mutex::new(None),
            sign_up_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn emit(&self, kind: AuthEventKind, session: Option<AuthSession>) {
        *self.session.lock().unwrap() = session.clone();
        let _ = self.events.send(AuthEvent::new(kind, session));
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn get_session(&self) -> Result<Option<AuthSession>> {
        Ok(self.session.lock().unwrap().clone())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession> {
        if let Some(err) = self.sign_in_error.lock().unwrap().clone() {
            return Err(err);
        }
        let session = session_for("u1", &credentials.email);
        self.emit(AuthEventKind::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome> {
        self.sign_up_calls.lock().unwrap().push(request.clone());
        if let Some(err) = self.sign_up_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(SignUpOutcome {
            user: Some(AuthUser {
                id: "new-user".to_string(),
                email: Some(request.credentials.email.clone()),
            }),
            session: None,
        })
    }

    async fn sign_out(&self) -> Result<()> {
        self.emit(AuthEventKind::SignedOut, None);
        match self.sign_out_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[derive(Default)]
pub struct MockProfileRepository {
    pub profiles: Mutex<HashMap<String, Profile>>,
    pub fail_reads: AtomicBool,
    /// Reads never complete
    pub hang: AtomicBool,
    pub fail_updates: AtomicBool,
    pub name_updates: Mutex<Vec<(String, String)>>,
}

impl MockProfileRepository {
    pub fn with_profile(profile: Profile) -> Self {
        let repo = Self::default();
        repo.profiles
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile);
        repo
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<Profile>> {
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(LeadmapError::data_access("permission denied for table profiles"));
        }
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }

    async fn update_name(&self, user_id: &str, display_name: &str) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(LeadmapError::data_access("row level security"));
        }
        self.name_updates
            .lock()
            .unwrap()
            .push((user_id.to_string(), display_name.to_string()));
        Ok(())
    }
}

struct Reply {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<Vec<Lead>>,
}

/// Lead repository answering from a script; falls back to `leads` when the
/// script is empty.
#[derive(Default)]
pub struct MockLeadRepository {
    pub leads: Mutex<Vec<Lead>>,
    script: Mutex<VecDeque<Reply>>,
    pub calls: AtomicUsize,
}

impl MockLeadRepository {
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        let repo = Self::default();
        *repo.leads.lock().unwrap() = leads;
        repo
    }

    pub fn push(&self, result: Result<Vec<Lead>>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Reply { gate: None, result });
    }

    /// Queues a reply held back until the returned sender fires.
    pub fn push_gated(&self, result: Result<Vec<Lead>>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(Reply {
            gate: Some(rx),
            result,
        });
        tx
    }
}

#[async_trait]
impl LeadRepository for MockLeadRepository {
    async fn fetch_all(&self) -> Result<Vec<Lead>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(Reply { gate, result }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result
            }
            None => Ok(self.leads.lock().unwrap().clone()),
        }
    }
}

pub struct MockTrigger {
    pub succeed: AtomicBool,
    pub requests: Mutex<Vec<AutomationRequest>>,
}

impl MockTrigger {
    pub fn new(succeed: bool) -> Self {
        Self {
            succeed: AtomicBool::new(succeed),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AutomationTrigger for MockTrigger {
    async fn trigger(&self, request: &AutomationRequest) -> bool {
        self.requests.lock().unwrap().push(request.clone());
        self.succeed.load(Ordering::SeqCst)
    }
}

pub fn lead(id: &str, city: &str, segment: &str, name: &str) -> Lead {
    Lead::new(id, format!("1199999{id}"))
        .with_city(city)
        .with_segment(segment)
        .with_name(name)
}
