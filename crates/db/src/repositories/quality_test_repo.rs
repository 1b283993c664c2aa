//! Repository for the `quality_tests` table.

use mortar_core::types::DbId;
use sqlx::PgPool;

use crate::models::quality_test::QualityTest;

/// Column list for `quality_tests` queries.
const COLUMNS: &str =
    "id, test_type, material_id, result, measured_value, notes, tested_at, created_at";

/// Provides data-access methods for quality tests.
pub struct QualityTestRepo;

impl QualityTestRepo {
    /// Find a quality test by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QualityTest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quality_tests WHERE id = $1");
        sqlx::query_as::<_, QualityTest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tests with a failing result, newest first.
    pub async fn list_failed(pool: &PgPool) -> Result<Vec<QualityTest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quality_tests
             WHERE result = 'failed'
             ORDER BY tested_at DESC"
        );
        sqlx::query_as::<_, QualityTest>(&query)
            .fetch_all(pool)
            .await
    }
}
