//! Lead-search automation use case.

use std::sync::Arc;
use std::time::Duration;

use leadmap_core::automation::{AutomationRequest, AutomationTrigger};
use leadmap_core::config::AutomationConfig;
use leadmap_core::error::Result;
use leadmap_core::notice::Notice;

use crate::lead_store::LeadStore;

/// Result of one submission, with the feedback to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub sent: bool,
    pub notice: Notice,
}

/// Fires the automation and, once it is accepted, schedules a single refresh
/// so the rows it inserts show up.
pub struct AutomationUseCase {
    trigger: Arc<dyn AutomationTrigger>,
    leads: Arc<LeadStore>,
    refresh_delay: Duration,
}

impl AutomationUseCase {
    pub fn new(
        trigger: Arc<dyn AutomationTrigger>,
        leads: Arc<LeadStore>,
        config: &AutomationConfig,
    ) -> Self {
        Self {
            trigger,
            leads,
            refresh_delay: config.refresh_delay(),
        }
    }

    /// Submits a search for `term` in `city`.
    ///
    /// Blank input is rejected with `LeadmapError::Validation` before anything
    /// is sent. Endpoint failures are not errors: they come back as an
    /// outcome with `sent == false` and the failure notice.
    pub async fn submit(&self, term: &str, city: &str) -> Result<SubmitOutcome> {
        let request = AutomationRequest::new(term, city)?;

        if self.trigger.trigger(&request).await {
            tracing::info!(
                "[Automation] Accepted; refreshing leads in {:?}",
                self.refresh_delay
            );
            self.leads.schedule_refresh(self.refresh_delay);
            Ok(SubmitOutcome {
                sent: true,
                notice: Notice::automation_sent(),
            })
        } else {
            tracing::error!("[Automation] Submission for {:?} failed", request.city());
            Ok(SubmitOutcome {
                sent: false,
                notice: Notice::automation_failed(),
            })
        }
    }
}
