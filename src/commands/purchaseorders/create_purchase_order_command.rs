use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        purchase_order_headers::{self, PurchaseOrderStatus},
        purchase_order_lines, vendors,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    tax::{self, TaxLine, TaxTotals},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseOrderCommand {
    pub vendor_id: Uuid,
    pub order_date: NaiveDate,
    pub expected_delivery_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "At least one line is required"))]
    pub lines: Vec<PurchaseOrderLineRequest>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// Buyer tax locality; the service layer injects this from configuration.
    #[serde(default)]
    pub home_state_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderLineRequest {
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit_rate: Decimal,
    pub gst_rate: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePurchaseOrderResult {
    pub id: Uuid,
    pub po_number: String,
    pub vendor_id: Uuid,
    pub status: PurchaseOrderStatus,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for CreatePurchaseOrderCommand {
    type Result = CreatePurchaseOrderResult;

    #[instrument(skip(self, db_pool, event_sender))]
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
        self.validate_lines()?;

        let db = db_pool.as_ref();

        let vendor = vendors::Entity::find_by_id(self.vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", self.vendor_id)))?;

        let intrastate = vendor.state_code == self.home_state_code;
        let totals = tax::calculate(&self.tax_lines(), intrastate)?;

        let saved = self.persist(db, &totals).await?;

        self.log_and_trigger_event(&event_sender, &saved).await?;

        Ok(CreatePurchaseOrderResult {
            id: saved.id,
            po_number: saved.po_number,
            vendor_id: saved.vendor_id,
            status: saved.status,
            subtotal: saved.subtotal,
            cgst: saved.cgst,
            sgst: saved.sgst,
            igst: saved.igst,
            total_amount: saved.total_amount,
            created_at: saved.created_at,
        })
    }
}

impl CreatePurchaseOrderCommand {
    fn validate_lines(&self) -> Result<(), ServiceError> {
        for (idx, line) in self.lines.iter().enumerate() {
            if line.item_name.trim().is_empty() {
                return Err(ServiceError::ValidationError(format!(
                    "Line {}: item name must not be blank",
                    idx + 1
                )));
            }
            if line.quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "Line {}: quantity must be positive",
                    idx + 1
                )));
            }
            if line.unit_rate <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "Line {}: rate must be positive",
                    idx + 1
                )));
            }
        }
        Ok(())
    }

    fn tax_lines(&self) -> Vec<TaxLine> {
        self.lines
            .iter()
            .map(|line| TaxLine::new(line.quantity, line.unit_rate, line.gst_rate))
            .collect()
    }

    fn generate_po_number() -> String {
        format!("PO-{}", Uuid::new_v4().simple())
    }

    async fn persist(
        &self,
        db: &DbPool,
        totals: &TaxTotals,
    ) -> Result<purchase_order_headers::Model, ServiceError> {
        let po_number = Self::generate_po_number();
        let vendor_id = self.vendor_id;
        let order_date = self.order_date;
        let expected_delivery_date = self.expected_delivery_date;
        let notes = self.notes.clone();
        let lines = self.lines.clone();
        let totals = totals.clone();

        db.transaction::<_, purchase_order_headers::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                let now = Utc::now();
                let header = purchase_order_headers::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    po_number: Set(po_number.clone()),
                    vendor_id: Set(vendor_id),
                    order_date: Set(order_date),
                    expected_delivery_date: Set(expected_delivery_date),
                    status: Set(PurchaseOrderStatus::Pending),
                    subtotal: Set(totals.subtotal),
                    cgst: Set(totals.cgst),
                    sgst: Set(totals.sgst),
                    igst: Set(totals.igst),
                    total_amount: Set(totals.total),
                    notes: Set(notes),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                let saved = header.insert(txn).await.map_err(|e| {
                    error!(po_number = %po_number, vendor_id = %vendor_id, "failed to create purchase order: {}", e);
                    ServiceError::db_error(e)
                })?;

                for (idx, line) in lines.iter().enumerate() {
                    let line_amount =
                        TaxLine::new(line.quantity, line.unit_rate, line.gst_rate).amount();
                    let new_line = purchase_order_lines::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        po_header_id: Set(saved.id),
                        line_num: Set(idx as i32 + 1),
                        item_id: Set(line.item_id),
                        item_name: Set(line.item_name.clone()),
                        quantity: Set(line.quantity),
                        unit_rate: Set(line.unit_rate),
                        gst_rate: Set(line.gst_rate),
                        line_amount: Set(line_amount),
                        received_quantity: Set(Decimal::ZERO),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    new_line.insert(txn).await.map_err(|e| {
                        error!(po_number = %po_number, item_id = %line.item_id, "failed to create purchase order line: {}", e);
                        ServiceError::db_error(e)
                    })?;
                }

                Ok(saved)
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }

    async fn log_and_trigger_event(
        &self,
        event_sender: &EventSender,
        saved: &purchase_order_headers::Model,
    ) -> Result<(), ServiceError> {
        info!(
            purchase_order_id = %saved.id,
            po_number = %saved.po_number,
            vendor_id = %self.vendor_id,
            lines = %self.lines.len(),
            total_amount = %saved.total_amount,
            "purchase order created"
        );

        event_sender
            .send(Event::PurchaseOrderCreated(saved.id))
            .await
            .map_err(|e| {
                let msg = format!("Failed to send event for created purchase order: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
