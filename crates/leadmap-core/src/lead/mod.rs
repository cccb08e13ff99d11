//! Lead domain module.
//!
//! # Module Structure
//!
//! - `model`: The `Lead` record
//! - `repository`: Read access and change-notification traits

mod model;
mod repository;

pub use model::Lead;
pub use repository::{ChangeKind, LeadChange, LeadChangeFeed, LeadRepository};
