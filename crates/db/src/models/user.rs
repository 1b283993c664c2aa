//! User entity model.

use mortar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
///
/// Email and phone number are both optional; a user with neither can
/// still receive in-app notifications. SMS is only sent when
/// `sms_alerts_enabled` is set and a phone number is present.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: String,
    pub sms_alerts_enabled: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
}
