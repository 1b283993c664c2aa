//! Repository for the `users` table.

use mortar_core::roles::ROLE_ADMIN;
use mortar_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, email, phone_number, role, sms_alerts_enabled, is_active, created_at";

/// Provides data-access methods for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all active admin users, the default notification audience.
    ///
    /// Rows carry the optional email/phone contact fields plus the
    /// `sms_alerts_enabled` opt-in flag; the recipient resolver decides
    /// which channels each can actually receive.
    pub async fn list_admin_recipients(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE role = $1 AND is_active = true
             ORDER BY id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(ROLE_ADMIN)
            .fetch_all(pool)
            .await
    }
}
