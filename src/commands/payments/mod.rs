use crate::{
    entities::{
        purchase_invoices::{self, PaymentStatus},
        purchase_payments,
    },
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

pub mod record_payment_command;
pub mod reverse_payment_command;

pub use record_payment_command::{RecordPaymentCommand, RecordPaymentResult};
pub use reverse_payment_command::{ReversePaymentCommand, ReversePaymentResult};

/// Recomputes an invoice's payment aggregates from the full set of payment
/// rows that exist on the caller's transaction. paid_amount is always the sum
/// of surviving rows — never an incremental patch — so a missed update cannot
/// drift silently.
pub(crate) async fn refresh_invoice_aggregates<C: ConnectionTrait>(
    conn: &C,
    invoice: purchase_invoices::Model,
) -> Result<purchase_invoices::Model, ServiceError> {
    let payments = purchase_payments::Entity::find()
        .filter(purchase_payments::Column::InvoiceId.eq(invoice.id))
        .all(conn)
        .await
        .map_err(ServiceError::db_error)?;

    let paid: Decimal = payments.iter().map(|p| p.amount).sum();
    let pending = invoice.total_amount - paid;
    let status = PaymentStatus::derive(invoice.total_amount, paid);

    let mut active: purchase_invoices::ActiveModel = invoice.into();
    active.paid_amount = Set(paid);
    active.pending_amount = Set(pending);
    active.payment_status = Set(status);
    active.updated_at = Set(Utc::now());

    active.update(conn).await.map_err(ServiceError::db_error)
}
