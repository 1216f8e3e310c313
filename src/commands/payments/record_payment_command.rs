use crate::{
    commands::{payments::refresh_invoice_aggregates, Command},
    db::DbPool,
    entities::{
        purchase_invoices::{self, PaymentStatus},
        purchase_payments::{self, PaymentMethod},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordPaymentCommand {
    pub invoice_id: Uuid,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[validate(length(max = 100))]
    pub reference_number: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordPaymentResult {
    pub payment_id: Uuid,
    pub invoice_id: Uuid,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub payment_status: PaymentStatus,
}

#[async_trait::async_trait]
impl Command for RecordPaymentCommand {
    type Result = RecordPaymentResult;

    #[instrument(skip(self, db_pool, event_sender), fields(invoice_id = %self.invoice_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        if self.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Payment amount must be positive".to_string(),
            ));
        }

        let invoice_id = self.invoice_id;
        let payment_date = self.payment_date;
        let amount = self.amount;
        let method = self.method;
        let reference_number = self.reference_number.clone();
        let notes = self.notes.clone();

        let (payment, invoice) = db_pool
            .transaction::<_, (purchase_payments::Model, purchase_invoices::Model), ServiceError>(
                move |txn| {
                    Box::pin(async move {
                        let invoice = purchase_invoices::Entity::find_by_id(invoice_id)
                            .one(txn)
                            .await
                            .map_err(ServiceError::db_error)?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!(
                                    "Purchase invoice {} not found",
                                    invoice_id
                                ))
                            })?;

                        if amount > invoice.pending_amount {
                            return Err(ServiceError::ValidationError(format!(
                                "Payment of {} exceeds pending amount {}",
                                amount, invoice.pending_amount
                            )));
                        }

                        let payment = purchase_payments::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            invoice_id: Set(invoice.id),
                            payment_date: Set(payment_date),
                            amount: Set(amount),
                            method: Set(method),
                            reference_number: Set(reference_number),
                            notes: Set(notes),
                            created_at: Set(Utc::now()),
                        };
                        let payment = payment.insert(txn).await.map_err(|e| {
                            error!(invoice_id = %invoice_id, "failed to record payment: {}", e);
                            ServiceError::db_error(e)
                        })?;

                        let invoice = refresh_invoice_aggregates(txn, invoice).await?;

                        Ok((payment, invoice))
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
            amount = %payment.amount,
            method = %payment.method,
            pending_amount = %invoice.pending_amount,
            "payment recorded"
        );

        event_sender
            .send_or_log(Event::PaymentRecorded {
                payment_id: payment.id,
                invoice_id: invoice.id,
                amount: payment.amount,
            })
            .await;

        Ok(RecordPaymentResult {
            payment_id: payment.id,
            invoice_id: invoice.id,
            paid_amount: invoice.paid_amount,
            pending_amount: invoice.pending_amount,
            payment_status: invoice.payment_status,
        })
    }
}
