use chrono::{DateTime, Utc};
use orders_db::{ColumnDef, Entity, EntityMapping};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An order as stored in the `orders` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// Unique identifier for the order
    pub id: Uuid,
    /// Customer that placed the order
    pub customer_id: String,
    /// Lifecycle status, owned by the order-processing code
    pub status: String,
    /// Order total in the smallest currency unit
    pub total_cents: i64,
    /// When the order was created
    pub created_at: DateTime<Utc>,
}

impl Entity for Order {
    fn mapping() -> EntityMapping {
        EntityMapping::new(
            "Order",
            "orders",
            vec![
                ColumnDef::new("id", "UUID").primary_key(),
                ColumnDef::new("customer_id", "TEXT"),
                ColumnDef::new("status", "TEXT"),
                ColumnDef::new("total_cents", "BIGINT"),
                ColumnDef::new("created_at", "TIMESTAMPTZ"),
            ],
        )
    }
}
