//! Composition root: wires the backend adapters into the stores.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use leadmap_core::config::LeadmapConfig;
use leadmap_infrastructure::{
    BroadcastChangeFeed, ConfigService, GoTrueAuthService, LeadmapPaths, PostgrestLeadRepository,
    PostgrestProfileRepository, SessionFile, SupabaseClient, WebhookAutomationTrigger,
};
use tokio_util::sync::CancellationToken;

use crate::automation_usecase::AutomationUseCase;
use crate::lead_store::LeadStore;
use crate::session_store::{SessionPhase, SessionStore};
use crate::subscription::Subscription;

/// Everything a host UI needs, connected to one backend project.
///
/// Leads are loaded each time the access gate opens onto the dashboard.
/// Dropping the dashboard (or calling `close`) stops the auth listener, the
/// change watcher, the initial loader and any pending scheduled refresh.
pub struct Dashboard {
    pub session: Arc<SessionStore>,
    pub leads: Arc<LeadStore>,
    pub automation: AutomationUseCase,
    /// Feed for the realtime transport to publish lead changes into
    pub changes: BroadcastChangeFeed,
    subscriptions: Vec<Subscription>,
}

impl Dashboard {
    /// Loads the configuration file and connects.
    pub fn from_default_config() -> Result<Self> {
        let config = ConfigService::new()
            .and_then(|service| service.get_config())
            .context("Failed to load configuration")?;
        Self::connect(&config, &LeadmapPaths::default())
    }

    /// Builds the adapters and starts the session store.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn connect(config: &LeadmapConfig, paths: &LeadmapPaths) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let client = SupabaseClient::from_config(&config.backend)?;

        let mut auth = GoTrueAuthService::new(client.clone());
        if config.auth.persist_session {
            let path = paths
                .session_file()
                .map_err(|e| anyhow!("Failed to resolve session file: {}", e))?;
            tracing::debug!("[Bootstrap] Persisting session at {:?}", path);
            auth = auth.with_session_file(SessionFile::new(path));
        }

        let profiles =
            PostgrestProfileRepository::new(client.clone(), config.backend.profiles_table.clone());
        let lead_repository =
            PostgrestLeadRepository::new(client, config.backend.leads_table.clone());

        let (session, session_subscription) =
            SessionStore::start(Arc::new(auth), Arc::new(profiles), &config.auth);

        let leads = LeadStore::new(Arc::new(lead_repository));
        let changes = BroadcastChangeFeed::default();
        let change_subscription = leads.watch_changes(&changes);
        let loader_subscription = load_leads_on_access(&session, &leads);

        let trigger = WebhookAutomationTrigger::from_config(&config.automation);
        let automation =
            AutomationUseCase::new(Arc::new(trigger), Arc::clone(&leads), &config.automation);

        tracing::info!("[Bootstrap] Connected to {}", config.backend.url);

        Ok(Self {
            session,
            leads,
            automation,
            changes,
            subscriptions: vec![
                session_subscription,
                change_subscription,
                loader_subscription,
            ],
        })
    }

    /// Tears down listeners and timers. Idempotent.
    pub fn close(&mut self) {
        for subscription in &mut self.subscriptions {
            subscription.close();
        }
        self.leads.close_timers();
    }
}

/// Fetches the leads whenever the session becomes authorized.
fn load_leads_on_access(session: &SessionStore, leads: &Arc<LeadStore>) -> Subscription {
    let mut states = session.subscribe();
    let token = CancellationToken::new();
    let mut subscription = Subscription::new(token.clone());
    let leads = Arc::clone(leads);

    subscription.push(tokio::spawn(async move {
        let mut open = false;
        loop {
            let authorized = states.borrow_and_update().phase() == SessionPhase::Authorized;
            if authorized && !open {
                tracing::info!("[Bootstrap] Access granted, loading leads");
                let _ = leads.refresh().await;
            }
            open = authorized;

            tokio::select! {
                _ = token.cancelled() => break,
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }));

    subscription
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.close();
    }
}
