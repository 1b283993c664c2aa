//! Repository for the `notification_triggers` table.

use mortar_core::types::DbId;
use sqlx::PgPool;

use crate::models::trigger::NotificationTrigger;

/// Column list for `notification_triggers` queries.
const COLUMNS: &str = "id, name, description, event_type, template_id, trigger_condition, \
                       is_active, last_executed_at, trigger_count, created_at, updated_at";

/// Provides data-access methods for notification triggers.
pub struct TriggerRepo;

impl TriggerRepo {
    /// Find a trigger by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<NotificationTrigger>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_triggers WHERE id = $1");
        sqlx::query_as::<_, NotificationTrigger>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all triggers registered for an event type.
    ///
    /// No active filter here: the executor owns the active check so
    /// that an inactive trigger produces a visible skip rather than
    /// silently vanishing from the dispatch set.
    pub async fn list_by_event_type(
        pool: &PgPool,
        event_type: &str,
    ) -> Result<Vec<NotificationTrigger>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_triggers
             WHERE event_type = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, NotificationTrigger>(&query)
            .bind(event_type)
            .fetch_all(pool)
            .await
    }

    /// Bump a trigger's execution metadata after a run.
    ///
    /// Last-writer-wins; concurrent bumps race harmlessly since the
    /// fields are advisory. Returns `true` if the trigger still exists.
    pub async fn record_execution(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notification_triggers
             SET last_executed_at = NOW(), trigger_count = trigger_count + 1
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
