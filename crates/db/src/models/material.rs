//! Material entity model.

use mortar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `materials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Material {
    pub id: DbId,
    pub name: String,
    pub unit: String,
    pub current_stock: f64,
    pub min_stock: f64,
    pub critical_stock: f64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
