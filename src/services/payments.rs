use crate::{
    commands::payments::{
        RecordPaymentCommand, RecordPaymentResult, ReversePaymentCommand, ReversePaymentResult,
    },
    commands::Command,
    db::DbPool,
    entities::purchase_payments,
    errors::ServiceError,
    events::EventSender,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for the invoice payment ledger.
#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PaymentService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Records a payment against an invoice
    #[instrument(skip(self, command))]
    pub async fn record_payment(
        &self,
        command: RecordPaymentCommand,
    ) -> Result<RecordPaymentResult, ServiceError> {
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    /// Reverses a recorded payment and restores the invoice aggregates
    #[instrument(skip(self))]
    pub async fn reverse_payment(
        &self,
        command: ReversePaymentCommand,
    ) -> Result<ReversePaymentResult, ServiceError> {
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    /// Gets a payment by ID
    #[instrument(skip(self))]
    pub async fn get_payment(
        &self,
        payment_id: Uuid,
    ) -> Result<Option<purchase_payments::Model>, ServiceError> {
        let payment = purchase_payments::Entity::find_by_id(payment_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(payment)
    }

    /// Gets all payments recorded against an invoice
    #[instrument(skip(self))]
    pub async fn get_payments_for_invoice(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<purchase_payments::Model>, ServiceError> {
        let payments = purchase_payments::Entity::find()
            .filter(purchase_payments::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(purchase_payments::Column::PaymentDate)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(payments)
    }
}
