//! Trigger execution log models and DTOs.
//!
//! Defines the database row struct for `trigger_execution_logs` and
//! the create DTO used when recording an execution attempt. Rows are
//! append-only: no update methods exist anywhere in the crate.

use mortar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// An execution log row from the `trigger_execution_logs` table.
///
/// One row is written per execution attempt that reached dispatch or
/// failed fatally; skipped executions (inactive trigger, conditions
/// not met, missing template, no recipients) leave no row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TriggerExecutionLog {
    pub id: DbId,
    pub trigger_id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub conditions_met: bool,
    pub notifications_sent: i32,
    pub error_message: Option<String>,
    pub executed_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for recording a trigger execution attempt.
#[derive(Debug, Clone)]
pub struct CreateExecutionLog {
    pub trigger_id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub conditions_met: bool,
    pub notifications_sent: i32,
    pub error_message: Option<String>,
}
