use crate::{
    commands::{payments::refresh_invoice_aggregates, Command},
    db::DbPool,
    entities::{
        purchase_invoices::{self, PaymentStatus},
        purchase_payments,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, ModelTrait, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Reverses a recorded payment by deleting its row and recomputing the owning
/// invoice's aggregates from the remaining rows, in one transaction. This is
/// the only way a payment ever changes after being recorded.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReversePaymentCommand {
    pub payment_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReversePaymentResult {
    pub payment_id: Uuid,
    pub invoice_id: Uuid,
    pub reversed_amount: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub payment_status: PaymentStatus,
}

#[async_trait::async_trait]
impl Command for ReversePaymentCommand {
    type Result = ReversePaymentResult;

    #[instrument(skip(self, db_pool, event_sender), fields(payment_id = %self.payment_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let payment_id = self.payment_id;

        let (payment, invoice) = db_pool
            .transaction::<_, (purchase_payments::Model, purchase_invoices::Model), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let payment = purchase_payments::Entity::find_by_id(payment_id)
                            .one(txn)
                            .await
                            .map_err(ServiceError::db_error)?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!(
                                    "Payment {} not found",
                                    payment_id
                                ))
                            })?;

                        let invoice = purchase_invoices::Entity::find_by_id(payment.invoice_id)
                            .one(txn)
                            .await
                            .map_err(ServiceError::db_error)?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!(
                                    "Purchase invoice {} not found",
                                    payment.invoice_id
                                ))
                            })?;

                        let removed = payment.clone();
                        payment
                            .delete(txn)
                            .await
                            .map_err(ServiceError::db_error)?;

                        let invoice = refresh_invoice_aggregates(txn, invoice).await?;

                        Ok((removed, invoice))
                    })
                },
            )
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(
            payment_id = %payment.id,
            invoice_id = %invoice.id,
            reversed_amount = %payment.amount,
            pending_amount = %invoice.pending_amount,
            "payment reversed"
        );

        event_sender
            .send_or_log(Event::PaymentReversed {
                payment_id: payment.id,
                invoice_id: invoice.id,
                amount: payment.amount,
            })
            .await;

        Ok(ReversePaymentResult {
            payment_id: payment.id,
            invoice_id: invoice.id,
            reversed_amount: payment.amount,
            paid_amount: invoice.paid_amount,
            pending_amount: invoice.pending_amount,
            payment_status: invoice.payment_status,
        })
    }
}
