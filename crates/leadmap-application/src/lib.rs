//! Application layer for LeadMap.
//!
//! Stateful use cases that sit between a host UI and the backend adapters:
//! the session store (authentication and access gate), the lead store
//! (dashboard view model), the automation use case and the bootstrap that
//! wires them together.

pub mod access;
pub mod automation_usecase;
pub mod bootstrap;
pub mod lead_store;
pub mod session_store;
pub mod subscription;

#[cfg(test)]
mod test_support;

pub use access::AccessGate;
pub use automation_usecase::{AutomationUseCase, SubmitOutcome};
pub use bootstrap::Dashboard;
pub use lead_store::{DashboardState, LeadStore};
pub use session_store::{SessionPhase, SessionSnapshot, SessionStore};
pub use subscription::Subscription;
