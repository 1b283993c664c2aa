//! Repository for the `materials` table.

use mortar_core::types::DbId;
use sqlx::PgPool;

use crate::models::material::Material;

/// Column list for `materials` queries.
const COLUMNS: &str = "id, name, unit, current_stock, min_stock, critical_stock, \
                       is_active, created_at, updated_at";

/// Provides data-access methods for materials.
pub struct MaterialRepo;

impl MaterialRepo {
    /// Find a material by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Material>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM materials WHERE id = $1");
        sqlx::query_as::<_, Material>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active materials whose stock has dropped below the minimum.
    pub async fn list_below_minimum(pool: &PgPool) -> Result<Vec<Material>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM materials
             WHERE is_active = true AND current_stock < min_stock
             ORDER BY id"
        );
        sqlx::query_as::<_, Material>(&query).fetch_all(pool).await
    }
}
