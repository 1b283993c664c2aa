//! Repository for the `trigger_execution_logs` table.

use mortar_core::types::DbId;
use sqlx::PgPool;

use crate::models::execution_log::{CreateExecutionLog, TriggerExecutionLog};

/// Column list for `trigger_execution_logs` queries.
const COLUMNS: &str = "id, trigger_id, entity_type, entity_id, conditions_met, \
                       notifications_sent, error_message, executed_at";

/// Provides data-access methods for trigger execution logs.
pub struct ExecutionLogRepo;

impl ExecutionLogRepo {
    /// Record a new execution log entry.
    pub async fn create(
        pool: &PgPool,
        input: &CreateExecutionLog,
    ) -> Result<TriggerExecutionLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO trigger_execution_logs
                (trigger_id, entity_type, entity_id, conditions_met,
                 notifications_sent, error_message)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TriggerExecutionLog>(&query)
            .bind(input.trigger_id)
            .bind(&input.entity_type)
            .bind(input.entity_id)
            .bind(input.conditions_met)
            .bind(input.notifications_sent)
            .bind(&input.error_message)
            .fetch_one(pool)
            .await
    }

    /// List execution logs for a specific trigger, newest first.
    pub async fn list_for_trigger(
        pool: &PgPool,
        trigger_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TriggerExecutionLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trigger_execution_logs
             WHERE trigger_id = $1
             ORDER BY executed_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, TriggerExecutionLog>(&query)
            .bind(trigger_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count execution logs for a specific trigger.
    pub async fn count_for_trigger(pool: &PgPool, trigger_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM trigger_execution_logs WHERE trigger_id = $1")
                .bind(trigger_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
