//! Delivery entity model.

use mortar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `deliveries` table.
///
/// Status is one of `pending`, `in_transit`, `delivered`, `cancelled`;
/// the first two are non-terminal and eligible for overdue scanning.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Delivery {
    pub id: DbId,
    pub supplier: String,
    pub material_id: Option<DbId>,
    pub quantity: f64,
    pub status: String,
    pub scheduled_at: Timestamp,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
