use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stock lot created per received invoice line. Batches are never merged
/// or split here; downstream inventory valuation consumes them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub batch_number: String,
    pub quantity: Decimal,
    pub purchase_rate: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub received_date: NaiveDate,
    /// Provenance: the invoice (and line) whose receipt created this batch.
    pub source_invoice_id: Uuid,
    pub source_invoice_line_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_invoices::Entity",
        from = "Column::SourceInvoiceId",
        to = "super::purchase_invoices::Column::Id"
    )]
    PurchaseInvoice,
}

impl Related<super::purchase_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseInvoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
