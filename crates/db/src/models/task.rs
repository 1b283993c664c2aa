//! Task entity model.

use mortar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tasks` table.
///
/// A task is overdue when its status is `open` or `in_progress` and
/// `due_date` is in the past.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub assignee_id: Option<DbId>,
    pub priority: String,
    pub status: String,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
