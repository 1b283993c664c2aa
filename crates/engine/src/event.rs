//! The domain event envelope fed into trigger dispatch.

use chrono::Utc;
use mortar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// A business event built by an event producer.
///
/// `event_type` routes the event to triggers; `entity_type` and
/// `entity_id` identify the subject for the audit log; `payload` is the
/// flat/nested record that conditions and templates reference by dot
/// path. Field names inside `payload` are part of the contract trigger
/// authors depend on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Event type key, e.g. `"stock_level_change"`.
    pub event_type: String,

    /// Subject entity kind (e.g. `"material"`, `"task"`).
    pub entity_type: String,

    /// Subject entity database id.
    pub entity_id: DbId,

    /// Event-specific JSON payload.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub occurred_at: Timestamp,
}

impl DomainEvent {
    /// Create a new event with an empty payload.
    pub fn new(
        event_type: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: DbId,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            entity_type: entity_type.into(),
            entity_id,
            payload: serde_json::Value::Object(Default::default()),
            occurred_at: Utc::now(),
        }
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}
