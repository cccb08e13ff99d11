//! In-process lead change feed.
//!
//! Whatever transport receives row-change notifications from the backend
//! feeds them in through `publish`; the dashboard subscribes through
//! `LeadChangeFeed`.

use leadmap_core::lead::{ChangeKind, LeadChange, LeadChangeFeed};
use serde_json::Value;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct BroadcastChangeFeed {
    sender: broadcast::Sender<LeadChange>,
}

impl Default for BroadcastChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Delivers a change to every current subscriber.
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, change: LeadChange) -> usize {
        tracing::debug!("[ChangeFeed] {:?} {:?}", change.kind, change.record_id);
        self.sender.send(change).unwrap_or(0)
    }

    /// Parses and publishes a raw notification; unknown shapes are dropped.
    pub fn publish_raw(&self, payload: &Value) -> usize {
        match parse_postgres_change(payload) {
            Some(change) => self.publish(change),
            None => {
                tracing::debug!("[ChangeFeed] Ignoring unrecognised payload");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl LeadChangeFeed for BroadcastChangeFeed {
    fn subscribe(&self) -> broadcast::Receiver<LeadChange> {
        self.sender.subscribe()
    }
}

/// Reads a row-change notification in either of the shapes the realtime
/// service emits: the flattened client form (`eventType`, `new`, `old`) or
/// the channel form (`data.type`, `data.record`, `data.old_record`).
pub fn parse_postgres_change(payload: &Value) -> Option<LeadChange> {
    let (kind, new, old) = if let Some(kind) = payload.get("eventType") {
        (kind, payload.get("new"), payload.get("old"))
    } else {
        let data = payload.get("data")?;
        (data.get("type")?, data.get("record"), data.get("old_record"))
    };

    let kind = match kind.as_str()?.to_ascii_uppercase().as_str() {
        "INSERT" => ChangeKind::Insert,
        "UPDATE" => ChangeKind::Update,
        "DELETE" => ChangeKind::Delete,
        _ => return None,
    };

    let record_id = [new, old]
        .into_iter()
        .flatten()
        .filter_map(|row| row.get("id"))
        .find_map(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

    Some(LeadChange::new(kind, record_id))
}
