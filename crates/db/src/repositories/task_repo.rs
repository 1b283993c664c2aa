//! Repository for the `tasks` table.

use mortar_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::Task;

/// Column list for `tasks` queries.
const COLUMNS: &str = "id, title, assignee_id, priority, status, due_date, \
                       completed_at, created_at, updated_at";

/// Provides data-access methods for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Find a task by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's overdue tasks, most overdue first.
    pub async fn list_overdue_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE assignee_id = $1
               AND status IN ('open', 'in_progress')
               AND due_date IS NOT NULL AND due_date < NOW()
             ORDER BY due_date"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List the distinct active users that have at least one overdue task.
    pub async fn list_assignees_with_overdue(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT u.id FROM users u
             JOIN tasks t ON t.assignee_id = u.id
             WHERE u.is_active = true
               AND t.status IN ('open', 'in_progress')
               AND t.due_date IS NOT NULL AND t.due_date < NOW()
             ORDER BY u.id",
        )
        .fetch_all(pool)
        .await
    }
}
