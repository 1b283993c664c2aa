//! Repository for the `deliveries` table.

use mortar_core::types::DbId;
use sqlx::PgPool;

use crate::models::delivery::Delivery;

/// Column list for `deliveries` queries.
const COLUMNS: &str = "id, supplier, material_id, quantity, status, scheduled_at, \
                       delivered_at, created_at, updated_at";

/// Provides data-access methods for deliveries.
pub struct DeliveryRepo;

impl DeliveryRepo {
    /// Find a delivery by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Delivery>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM deliveries WHERE id = $1");
        sqlx::query_as::<_, Delivery>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List non-terminal deliveries whose scheduled time has passed.
    pub async fn list_overdue(pool: &PgPool) -> Result<Vec<Delivery>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM deliveries
             WHERE status IN ('pending', 'in_transit') AND scheduled_at < NOW()
             ORDER BY scheduled_at"
        );
        sqlx::query_as::<_, Delivery>(&query).fetch_all(pool).await
    }
}
