use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_order_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub po_header_id: Uuid,
    pub line_num: i32,
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit_rate: Decimal,
    pub gst_rate: Decimal,
    /// GST-inclusive amount, always recomputed from quantity/rate/gst_rate.
    pub line_amount: Decimal,
    /// Monotonically non-decreasing; 0 <= received_quantity <= quantity.
    pub received_quantity: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Quantity still open for receipt.
    pub fn outstanding_quantity(&self) -> Decimal {
        (self.quantity - self.received_quantity).max(Decimal::ZERO)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_order_headers::Entity",
        from = "Column::PoHeaderId",
        to = "super::purchase_order_headers::Column::Id"
    )]
    PurchaseOrderHeader,
}

impl Related<super::purchase_order_headers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrderHeader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
