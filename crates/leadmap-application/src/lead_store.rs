//! Dashboard view model.
//!
//! `LeadStore` owns the loaded leads and everything the dashboard derives from
//! them: the city list, the active filter, the row selection and the fetch
//! error banner. Every mutation goes through a method here and is published
//! on a `watch` channel.
//!
//! Each fetch replaces the whole list. Fetches are numbered when they start;
//! a result is applied only if no later-started fetch has been applied
//! already, so an old response arriving late never overwrites a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use leadmap_core::error::Result;
use leadmap_core::export::{CsvExport, export_selected};
use leadmap_core::filter::{
    DashboardCounts, LeadFilter, SegmentSummary, dashboard_counts, distinct_cities, filter_leads,
    segment_summary,
};
use leadmap_core::lead::{Lead, LeadChangeFeed, LeadRepository};
use leadmap_core::notice::Notice;
use leadmap_core::selection::Selection;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::subscription::Subscription;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    /// Newest first, as returned by the last applied fetch
    pub leads: Vec<Lead>,
    pub cities: Vec<String>,
    pub filter: LeadFilter,
    pub selection: Selection,
    /// Persistent banner of the last failed fetch
    pub error: Option<Notice>,
    /// True until the first fetch settles
    pub loading: bool,
    /// True while any fetch is in flight
    pub fetching: bool,
    /// Lead whose details are open
    pub focused: Option<String>,
    in_flight: usize,
    applied_seq: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            leads: Vec::new(),
            cities: Vec::new(),
            filter: LeadFilter::default(),
            selection: Selection::default(),
            error: None,
            loading: true,
            fetching: false,
            focused: None,
            in_flight: 0,
            applied_seq: 0,
        }
    }
}

impl DashboardState {
    /// Leads passing the current filter, in list order.
    pub fn visible(&self) -> Vec<&Lead> {
        filter_leads(&self.leads, &self.filter)
    }

    /// Segment breakdown of the selected city, if one is selected.
    pub fn city_segments(&self) -> Option<SegmentSummary> {
        self.filter
            .city
            .as_deref()
            .map(|city| segment_summary(&self.leads, city))
    }

    pub fn counts(&self) -> DashboardCounts {
        dashboard_counts(&self.leads, &self.cities)
    }

    /// State of the "select all" checkbox.
    pub fn all_visible_selected(&self) -> bool {
        self.selection.covers_all(&self.visible())
    }

    pub fn focused_lead(&self) -> Option<&Lead> {
        let id = self.focused.as_deref()?;
        self.leads.iter().find(|lead| lead.id == id)
    }

    fn is_loaded(&self, id: &str) -> bool {
        self.leads.iter().any(|lead| lead.id == id)
    }
}

pub struct LeadStore {
    repository: Arc<dyn LeadRepository>,
    state: watch::Sender<DashboardState>,
    next_seq: AtomicU64,
    /// Cancelled by `close_timers`, then replaced
    timers: Mutex<CancellationToken>,
}

/// Keeps the in-flight count right even if the fetch future is dropped.
struct FetchGuard<'a> {
    state: &'a watch::Sender<DashboardState>,
}

impl<'a> FetchGuard<'a> {
    fn begin(state: &'a watch::Sender<DashboardState>) -> Self {
        state.send_modify(|s| {
            s.in_flight += 1;
            s.fetching = true;
        });
        Self { state }
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            s.fetching = s.in_flight > 0;
        });
    }
}

impl LeadStore {
    pub fn new(repository: Arc<dyn LeadRepository>) -> Arc<Self> {
        let (state, _) = watch::channel(DashboardState::default());
        Arc::new(Self {
            repository,
            state,
            next_seq: AtomicU64::new(0),
            timers: Mutex::new(CancellationToken::new()),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn visible_leads(&self) -> Vec<Lead> {
        self.state.borrow().visible().into_iter().cloned().collect()
    }

    pub fn city_segments(&self) -> Option<SegmentSummary> {
        self.state.borrow().city_segments()
    }

    pub fn counts(&self) -> DashboardCounts {
        self.state.borrow().counts()
    }

    /// Fetches every lead and replaces the list.
    ///
    /// A failure is recorded as the banner notice and also returned; the
    /// previous list stays visible.
    pub async fn refresh(&self) -> Result<()> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = FetchGuard::begin(&self.state);

        let result = self.repository.fetch_all().await;
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);

        self.state.send_if_modified(|state| {
            if seq < state.applied_seq {
                tracing::debug!(
                    "[LeadStore] Dropping fetch #{} (#{} already applied)",
                    seq,
                    state.applied_seq
                );
                return false;
            }
            state.applied_seq = seq;
            state.loading = false;

            match result {
                Ok(leads) => {
                    tracing::debug!("[LeadStore] Loaded {} leads", leads.len());
                    state.cities = distinct_cities(&leads);
                    state.leads = leads;
                    state.selection.retain_loaded(&state.leads);
                    if state
                        .focused
                        .as_deref()
                        .is_some_and(|id| !state.is_loaded(id))
                    {
                        state.focused = None;
                    }
                    state.error = None;
                }
                Err(e) => {
                    tracing::error!("[LeadStore] Fetch failed: {}", e);
                    state.error = Some(Notice::fetch_failed(&e));
                }
            }
            true
        });

        outcome
    }

    /// "Todos os Leads": drops city and segment filters.
    pub fn show_all_leads(&self) {
        self.state.send_modify(|state| {
            state.filter.city = None;
            state.filter.segment = None;
            state.selection.clear();
        });
    }

    /// Selects a city, or deselects it when it is already selected with no
    /// segment. The segment filter is reset either way.
    pub fn select_city(&self, city: &str) {
        self.state.send_modify(|state| {
            let same = state.filter.city.as_deref() == Some(city);
            if same && state.filter.segment.is_none() {
                state.filter.city = None;
            } else {
                state.filter.city = Some(city.to_string());
            }
            state.filter.segment = None;
            state.selection.clear();
        });
    }

    /// Narrows to one segment; `None` is "Todos os Segmentos".
    pub fn select_segment(&self, segment: Option<&str>) {
        self.state.send_modify(|state| {
            state.filter.segment = segment.map(str::to_string);
            state.selection.clear();
        });
    }

    pub fn set_search(&self, search: impl Into<String>) {
        let search = search.into();
        self.state.send_if_modified(|state| {
            if state.filter.search == search {
                return false;
            }
            state.filter.search = search;
            true
        });
    }

    /// Flips one row. Unknown identifiers are ignored; returns whether the
    /// row is now selected.
    pub fn toggle_row(&self, id: &str) -> bool {
        let mut selected = false;
        self.state.send_if_modified(|state| {
            if !state.is_loaded(id) {
                return false;
            }
            selected = state.selection.toggle(id);
            true
        });
        selected
    }

    /// Selects every visible lead, or clears when they already are.
    pub fn toggle_select_all(&self) {
        self.state.send_modify(|state| {
            let visible = filter_leads(&state.leads, &state.filter);
            state.selection.toggle_all(&visible);
        });
    }

    pub fn clear_selection(&self) {
        self.state.send_if_modified(|state| {
            let changed = !state.selection.is_empty();
            state.selection.clear();
            changed
        });
    }

    /// Opens the detail view of a loaded lead.
    pub fn open_details(&self, id: &str) -> bool {
        self.state.send_if_modified(|state| {
            if !state.is_loaded(id) {
                return false;
            }
            state.focused = Some(id.to_string());
            true
        })
    }

    pub fn close_details(&self) {
        self.state.send_if_modified(|state| state.focused.take().is_some());
    }

    /// Renders the selected leads as CSV. `None` when nothing is selected.
    pub fn export_selected(&self, today: NaiveDate) -> Option<CsvExport> {
        let state = self.state.borrow();
        let export = export_selected(&state.leads, &state.selection, today)?;
        tracing::info!(
            "[LeadStore] Exported {} leads to {}",
            export.rows,
            export.filename
        );
        Some(export)
    }

    /// Refetches on every change reported by `feed`, in delivery order.
    pub fn watch_changes(self: &Arc<Self>, feed: &dyn LeadChangeFeed) -> Subscription {
        let mut changes = feed.subscribe();
        let token = CancellationToken::new();
        let mut subscription = Subscription::new(token.clone());
        let store = Arc::clone(self);

        subscription.push(tokio::spawn(async move {
            loop {
                let received = tokio::select! {
                    _ = token.cancelled() => break,
                    received = changes.recv() => received,
                };

                match received {
                    Ok(change) => {
                        tracing::debug!(
                            "[LeadStore] Change {:?} on {:?}, refetching",
                            change.kind,
                            change.record_id
                        );
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("[LeadStore] Missed {} change events, refetching", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }

                // Runs as its own task: closing the watcher stops waiting for
                // it, but the fetch still completes and is applied
                let fetch = {
                    let store = Arc::clone(&store);
                    tokio::spawn(async move {
                        let _ = store.refresh().await;
                    })
                };
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = fetch => {}
                }
            }
        }));

        tracing::info!("[LeadStore] Watching lead changes");
        subscription
    }

    /// Refetches once after `delay`, unless `close_timers` runs first.
    pub fn schedule_refresh(self: &Arc<Self>, delay: Duration) {
        let token = self
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let store = Arc::clone(self);

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("[LeadStore] Scheduled refresh cleared");
                }
                _ = tokio::time::sleep(delay) => {
                    let _ = store.refresh().await;
                }
            }
        });
    }

    /// Clears pending scheduled refreshes. Fetches already running finish.
    pub fn close_timers(&self) {
        let mut timers = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
        timers.cancel();
        *timers = CancellationToken::new();
    }
}
