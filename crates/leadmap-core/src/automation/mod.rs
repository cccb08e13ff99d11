//! Lead-search automation.
//!
//! The automation is an external service that, given a search term and a
//! city, asynchronously inserts new lead rows into the backend.

mod model;

pub use model::{
    AutomationRequest, DEFAULT_FORM_MODE, DEFAULT_WEBHOOK_URL, WebhookPayload,
    format_submitted_at,
};

use async_trait::async_trait;

/// Fires the automation.
#[async_trait]
pub trait AutomationTrigger: Send + Sync {
    /// Submits the request.
    ///
    /// Returns true iff the endpoint acknowledged with a success status.
    /// Transport failures are reported as `false`, never as a panic or error.
    async fn trigger(&self, request: &AutomationRequest) -> bool;
}
