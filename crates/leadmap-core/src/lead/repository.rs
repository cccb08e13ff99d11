//! Lead repository and change-feed traits.
//!
//! The dashboard reads leads through `LeadRepository` and learns about
//! backend-side writes through `LeadChangeFeed`. Callers never depend on how
//! either is transported, so the refetch-everything strategy can later be
//! swapped for incremental updates behind these traits.

use super::model::Lead;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Read access to the lead table.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Fetches every lead.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Lead>)`: All leads, ordered by `created_at` descending
    /// - `Err(_)`: Backend or transport failure
    async fn fetch_all(&self) -> Result<Vec<Lead>>;
}

/// Kind of row-level change reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A change notification scoped to the lead table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadChange {
    pub kind: ChangeKind,
    /// Identifier of the affected row, when the transport reports it
    #[serde(default)]
    pub record_id: Option<String>,
}

impl LeadChange {
    pub fn new(kind: ChangeKind, record_id: Option<String>) -> Self {
        Self { kind, record_id }
    }
}

/// Source of lead-table change notifications.
///
/// Each call to `subscribe` returns an independent receiver that sees every
/// change published after the call, in delivery order.
pub trait LeadChangeFeed: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<LeadChange>;
}
