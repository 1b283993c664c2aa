//! Repository for the `notification_templates` table.

use mortar_core::types::DbId;
use sqlx::PgPool;

use crate::models::template::NotificationTemplate;

/// Column list for `notification_templates` queries.
const COLUMNS: &str = "id, name, subject, body_text, body_html, channels, is_active, \
                       created_at, updated_at";

/// Provides data-access methods for notification templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Find a template by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<NotificationTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_templates WHERE id = $1");
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
