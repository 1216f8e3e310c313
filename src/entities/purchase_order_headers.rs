use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate receipt status of a purchase order.
///
/// Stored on the header purely as a cache: every mutation re-derives it from
/// the full line set via [`PurchaseOrderStatus::derive`], never toggles it
/// incrementally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PurchaseOrderStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Partial")]
    Partial,
    #[sea_orm(string_value = "Received")]
    Received,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl PurchaseOrderStatus {
    /// Recomputes the aggregate status from the per-line truth.
    ///
    /// Received iff every line is fully received; Partial iff anything at all
    /// has been received; Pending otherwise. Cancellation is orthogonal and
    /// never derived.
    pub fn derive(lines: &[super::purchase_order_lines::Model]) -> Self {
        if !lines.is_empty()
            && lines
                .iter()
                .all(|line| line.received_quantity >= line.quantity)
        {
            return PurchaseOrderStatus::Received;
        }
        if lines
            .iter()
            .any(|line| line.received_quantity > Decimal::ZERO)
        {
            PurchaseOrderStatus::Partial
        } else {
            PurchaseOrderStatus::Pending
        }
    }
}

impl std::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PurchaseOrderStatus::Pending => "Pending",
            PurchaseOrderStatus::Partial => "Partial",
            PurchaseOrderStatus::Received => "Received",
            PurchaseOrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_order_headers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub po_number: String,
    pub vendor_id: Uuid,
    pub order_date: NaiveDate,
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: PurchaseOrderStatus,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id"
    )]
    Vendor,
    #[sea_orm(has_many = "super::purchase_order_lines::Entity")]
    PurchaseOrderLines,
    #[sea_orm(has_many = "super::purchase_invoices::Entity")]
    PurchaseInvoices,
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::purchase_order_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrderLines.def()
    }
}

impl Related<super::purchase_invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseInvoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(ordered: Decimal, received: Decimal) -> super::super::purchase_order_lines::Model {
        super::super::purchase_order_lines::Model {
            id: Uuid::new_v4(),
            po_header_id: Uuid::new_v4(),
            line_num: 1,
            item_id: Uuid::new_v4(),
            item_name: "item".to_string(),
            quantity: ordered,
            unit_rate: dec!(10),
            gst_rate: dec!(18),
            line_amount: dec!(118),
            received_quantity: received,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn all_lines_untouched_is_pending() {
        let lines = vec![line(dec!(10), dec!(0)), line(dec!(5), dec!(0))];
        assert_eq!(
            PurchaseOrderStatus::derive(&lines),
            PurchaseOrderStatus::Pending
        );
    }

    #[test]
    fn any_received_quantity_makes_it_partial() {
        let lines = vec![line(dec!(10), dec!(6)), line(dec!(5), dec!(0))];
        assert_eq!(
            PurchaseOrderStatus::derive(&lines),
            PurchaseOrderStatus::Partial
        );
    }

    #[test]
    fn one_full_line_among_open_ones_is_still_partial() {
        let lines = vec![line(dec!(10), dec!(10)), line(dec!(5), dec!(0))];
        assert_eq!(
            PurchaseOrderStatus::derive(&lines),
            PurchaseOrderStatus::Partial
        );
    }

    #[test]
    fn every_line_full_is_received() {
        let lines = vec![line(dec!(10), dec!(10)), line(dec!(5), dec!(5))];
        assert_eq!(
            PurchaseOrderStatus::derive(&lines),
            PurchaseOrderStatus::Received
        );
    }

    #[test]
    fn empty_line_set_stays_pending() {
        assert_eq!(PurchaseOrderStatus::derive(&[]), PurchaseOrderStatus::Pending);
    }
}
