//! Notification template entity model.

use mortar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notification_templates` table.
///
/// Subject and bodies may contain `{{dotted.path}}` placeholders that
/// are rendered against the event payload at dispatch time. `channels`
/// is a JSON array of channel names (`email`, `sms`, `in_app`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationTemplate {
    pub id: DbId,
    pub name: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub channels: serde_json::Value,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
