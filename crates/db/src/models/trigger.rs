//! Notification trigger entity model.

use mortar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notification_triggers` table.
///
/// `trigger_condition` holds the stored condition tree in one of its
/// two JSON shapes (flat array or grouped object); parsing happens at
/// evaluation time so a malformed document disables the trigger
/// rather than the engine. `template_id` goes NULL when the referenced
/// template is deleted, which surfaces as a "Template not found" skip.
/// `last_executed_at` and `trigger_count` are advisory metadata bumped
/// after each dispatch-reaching execution.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationTrigger {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub event_type: String,
    pub template_id: Option<DbId>,
    pub trigger_condition: serde_json::Value,
    pub is_active: bool,
    pub last_executed_at: Option<Timestamp>,
    pub trigger_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
