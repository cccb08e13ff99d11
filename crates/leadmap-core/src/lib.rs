//! Domain layer of the LeadMap client.
//!
//! Holds the lead and auth models, the traits the infrastructure layer
//! implements, and the pure filtering, aggregation, selection and export
//! logic the dashboard is built on.

pub mod auth;
pub mod automation;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod lead;
pub mod notice;
pub mod selection;

// Re-export common error type
pub use error::{LeadmapError, Result};
