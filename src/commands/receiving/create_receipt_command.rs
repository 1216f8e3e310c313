use crate::{
    commands::Command,
    db::DbPool,
    entities::{
        inventory_batches,
        purchase_invoice_lines,
        purchase_invoices::{self, PaymentStatus},
        purchase_order_headers::{self, PurchaseOrderStatus},
        purchase_order_lines, vendors,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::inventory::{self, BatchAllocation},
    tax::{self, TaxLine, TaxTotals},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionError,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Records a goods receipt: the purchase invoice, its lines, one inventory
/// batch per line, and — when made against a purchase order — the order's
/// per-line received quantities and re-derived status. All writes are one
/// transaction; a receipt never exists without its lines, its batches, and a
/// consistent order.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReceiptCommand {
    /// Registered vendor. Exactly one of vendor_id / vendor_name is required;
    /// a bare vendor_name records an unregistered (ad-hoc) purchase.
    pub vendor_id: Option<Uuid>,
    pub vendor_name: Option<String>,
    #[validate(length(min = 1, message = "Invoice number must not be blank"))]
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub received_date: NaiveDate,
    pub purchase_order_id: Option<Uuid>,
    #[validate(length(min = 1, message = "At least one line is required"))]
    pub lines: Vec<ReceiptLineRequest>,
    pub other_charges: Option<Decimal>,
    pub rounding: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// Buyer tax locality; the service layer injects this from configuration.
    #[serde(default)]
    pub home_state_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptLineRequest {
    pub item_id: Uuid,
    pub item_name: String,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub quantity: Decimal,
    pub unit_rate: Decimal,
    pub gst_rate: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateReceiptResult {
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub igst: Decimal,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub purchase_order_id: Option<Uuid>,
    pub order_status: Option<PurchaseOrderStatus>,
    pub batch_ids: Vec<Uuid>,
}

struct PersistOutcome {
    invoice: purchase_invoices::Model,
    batches: Vec<inventory_batches::Model>,
    status_change: Option<(PurchaseOrderStatus, PurchaseOrderStatus)>,
}

#[async_trait::async_trait]
impl Command for CreateReceiptCommand {
    type Result = CreateReceiptResult;

    #[instrument(skip(self, db_pool, event_sender), fields(invoice_number = %self.invoice_number))]
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
        self.validate_vendor_and_lines()?;

        let db = db_pool.as_ref();
        let intrastate = self.resolve_intrastate(db).await?;

        let totals = tax::calculate(&self.tax_lines(), intrastate)?.with_adjustments(
            self.other_charges.unwrap_or(Decimal::ZERO),
            self.rounding.unwrap_or(Decimal::ZERO),
        );

        let outcome = self.persist(db, &totals).await?;

        self.log_and_trigger_events(&event_sender, &outcome).await;

        Ok(CreateReceiptResult {
            invoice_id: outcome.invoice.id,
            invoice_number: outcome.invoice.invoice_number,
            subtotal: outcome.invoice.subtotal,
            cgst: outcome.invoice.cgst,
            sgst: outcome.invoice.sgst,
            igst: outcome.invoice.igst,
            total_amount: outcome.invoice.total_amount,
            payment_status: outcome.invoice.payment_status,
            purchase_order_id: outcome.invoice.po_header_id,
            order_status: outcome.status_change.map(|(_, new)| new),
            batch_ids: outcome.batches.iter().map(|b| b.id).collect(),
        })
    }
}

impl CreateReceiptCommand {
    fn validate_vendor_and_lines(&self) -> Result<(), ServiceError> {
        let has_name = self
            .vendor_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if self.vendor_id.is_none() && !has_name {
            return Err(ServiceError::ValidationError(
                "Either a registered vendor or an unregistered vendor name is required".to_string(),
            ));
        }

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

    /// Registered vendors are intrastate when their state matches the buyer's;
    /// unregistered purchases default to intrastate.
    async fn resolve_intrastate(&self, db: &DbPool) -> Result<bool, ServiceError> {
        match self.vendor_id {
            Some(vendor_id) => {
                let vendor = vendors::Entity::find_by_id(vendor_id)
                    .one(db)
                    .await
                    .map_err(ServiceError::db_error)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Vendor {} not found", vendor_id))
                    })?;
                Ok(vendor.state_code == self.home_state_code)
            }
            None => Ok(true),
        }
    }

    fn tax_lines(&self) -> Vec<TaxLine> {
        self.lines
            .iter()
            .map(|line| TaxLine::new(line.quantity, line.unit_rate, line.gst_rate))
            .collect()
    }

    async fn persist(&self, db: &DbPool, totals: &TaxTotals) -> Result<PersistOutcome, ServiceError> {
        let vendor_id = self.vendor_id;
        let vendor_name = self.vendor_name.clone();
        let invoice_number = self.invoice_number.clone();
        let invoice_date = self.invoice_date;
        let received_date = self.received_date;
        let purchase_order_id = self.purchase_order_id;
        let lines = self.lines.clone();
        let other_charges = self.other_charges.unwrap_or(Decimal::ZERO);
        let rounding = self.rounding.unwrap_or(Decimal::ZERO);
        let notes = self.notes.clone();
        let totals = totals.clone();

        db.transaction::<_, PersistOutcome, ServiceError>(move |txn| {
            Box::pin(async move {
                let now = Utc::now();

                // Resolve and check the originating order before writing
                // anything, so every rejection leaves no partial state.
                let order_context = match purchase_order_id {
                    Some(po_id) => {
                        let header = purchase_order_headers::Entity::find_by_id(po_id)
                            .one(txn)
                            .await
                            .map_err(ServiceError::db_error)?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!(
                                    "Purchase order {} not found",
                                    po_id
                                ))
                            })?;

                        if header.status == PurchaseOrderStatus::Cancelled {
                            return Err(ServiceError::InvalidOperation(
                                "Cannot receive against a cancelled purchase order".to_string(),
                            ));
                        }
                        if let Some(vendor_id) = vendor_id {
                            if header.vendor_id != vendor_id {
                                return Err(ServiceError::InvalidOperation(
                                    "Receipt vendor does not match the purchase order vendor"
                                        .to_string(),
                                ));
                            }
                        }

                        let order_lines = purchase_order_lines::Entity::find()
                            .filter(purchase_order_lines::Column::PoHeaderId.eq(po_id))
                            .all(txn)
                            .await
                            .map_err(ServiceError::db_error)?;

                        Some((header, order_lines))
                    }
                    None => None,
                };

                // Validate every line against the order before any write.
                let mut line_updates: Vec<(purchase_order_lines::Model, Decimal)> = Vec::new();
                if let Some((_, ref order_lines)) = order_context {
                    for line in &lines {
                        let order_line = order_lines
                            .iter()
                            .find(|ol| ol.item_id == line.item_id)
                            .ok_or_else(|| {
                                ServiceError::InvalidOperation(format!(
                                    "Item {} ({}) is not on the purchase order",
                                    line.item_name, line.item_id
                                ))
                            })?;

                        let already_received = line_updates
                            .iter()
                            .filter(|(ol, _)| ol.id == order_line.id)
                            .map(|(_, qty)| *qty)
                            .sum::<Decimal>()
                            + order_line.received_quantity;

                        if already_received + line.quantity > order_line.quantity {
                            return Err(ServiceError::InvalidOperation(format!(
                                "Cannot receive more than ordered for {}. Ordered: {}, already received: {}, trying to receive: {}",
                                line.item_name,
                                order_line.quantity,
                                already_received,
                                line.quantity
                            )));
                        }

                        line_updates.push((order_line.clone(), line.quantity));
                    }
                }

                let invoice_id = Uuid::new_v4();
                let invoice = purchase_invoices::ActiveModel {
                    id: Set(invoice_id),
                    invoice_number: Set(invoice_number.clone()),
                    po_header_id: Set(purchase_order_id),
                    vendor_id: Set(vendor_id),
                    vendor_name: Set(vendor_name),
                    invoice_date: Set(invoice_date),
                    received_date: Set(received_date),
                    subtotal: Set(totals.subtotal),
                    cgst: Set(totals.cgst),
                    sgst: Set(totals.sgst),
                    igst: Set(totals.igst),
                    other_charges: Set(other_charges),
                    rounding: Set(rounding),
                    total_amount: Set(totals.total),
                    paid_amount: Set(Decimal::ZERO),
                    pending_amount: Set(totals.total),
                    payment_status: Set(PaymentStatus::Pending),
                    notes: Set(notes),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                let invoice = invoice.insert(txn).await.map_err(|e| {
                    error!(invoice_number = %invoice_number, "failed to create purchase invoice: {}", e);
                    ServiceError::db_error(e)
                })?;

                let mut batches = Vec::with_capacity(lines.len());
                for (idx, line) in lines.iter().enumerate() {
                    let line_num = idx as i32 + 1;
                    let line_amount =
                        TaxLine::new(line.quantity, line.unit_rate, line.gst_rate).amount();

                    let invoice_line = purchase_invoice_lines::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        invoice_id: Set(invoice.id),
                        line_num: Set(line_num),
                        item_id: Set(line.item_id),
                        item_name: Set(line.item_name.clone()),
                        batch_number: Set(line.batch_number.clone()),
                        expiry_date: Set(line.expiry_date),
                        quantity: Set(line.quantity),
                        unit_rate: Set(line.unit_rate),
                        gst_rate: Set(line.gst_rate),
                        line_amount: Set(line_amount),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    let invoice_line = invoice_line
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    let batch = inventory::allocate(
                        txn,
                        BatchAllocation {
                            item_id: line.item_id,
                            quantity: line.quantity,
                            purchase_rate: line.unit_rate,
                            batch_number: line.batch_number.clone(),
                            expiry_date: line.expiry_date,
                            received_date,
                            invoice_id: invoice.id,
                            invoice_line_id: Some(invoice_line.id),
                            invoice_number: invoice_number.clone(),
                            line_num,
                        },
                    )
                    .await?;
                    batches.push(batch);
                }

                // Apply order-line increments (merged per line, so two receipt
                // lines for the same item accumulate), then re-derive the
                // aggregate status from the full, freshly-read line set.
                let mut merged_updates: Vec<(purchase_order_lines::Model, Decimal)> = Vec::new();
                for (order_line, qty) in line_updates {
                    match merged_updates
                        .iter_mut()
                        .find(|(existing, _)| existing.id == order_line.id)
                    {
                        Some((_, total)) => *total += qty,
                        None => merged_updates.push((order_line, qty)),
                    }
                }

                let status_change = match order_context {
                    Some((header, _)) => {
                        for (order_line, received_now) in merged_updates {
                            let new_received = order_line.received_quantity + received_now;
                            let mut active: purchase_order_lines::ActiveModel = order_line.into();
                            active.received_quantity = Set(new_received);
                            active.updated_at = Set(now);
                            active.update(txn).await.map_err(ServiceError::db_error)?;
                        }

                        let refreshed_lines = purchase_order_lines::Entity::find()
                            .filter(purchase_order_lines::Column::PoHeaderId.eq(header.id))
                            .all(txn)
                            .await
                            .map_err(ServiceError::db_error)?;

                        let old_status = header.status;
                        let new_status = PurchaseOrderStatus::derive(&refreshed_lines);

                        let header_id = header.id;
                        let mut active: purchase_order_headers::ActiveModel = header.into();
                        active.status = Set(new_status);
                        active.updated_at = Set(now);
                        active.update(txn).await.map_err(|e| {
                            error!(purchase_order_id = %header_id, "failed to update order status: {}", e);
                            ServiceError::db_error(e)
                        })?;

                        Some((old_status, new_status))
                    }
                    None => None,
                };

                Ok(PersistOutcome {
                    invoice,
                    batches,
                    status_change,
                })
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }

    async fn log_and_trigger_events(&self, event_sender: &EventSender, outcome: &PersistOutcome) {
        info!(
            invoice_id = %outcome.invoice.id,
            invoice_number = %outcome.invoice.invoice_number,
            purchase_order_id = ?outcome.invoice.po_header_id,
            total_amount = %outcome.invoice.total_amount,
            batches = %outcome.batches.len(),
            "goods receipt recorded"
        );

        event_sender
            .send_or_log(Event::GoodsReceiptCreated {
                invoice_id: outcome.invoice.id,
                po_id: outcome.invoice.po_header_id,
            })
            .await;

        for batch in &outcome.batches {
            event_sender
                .send_or_log(Event::InventoryBatchCreated {
                    batch_id: batch.id,
                    item_id: batch.item_id,
                    quantity: batch.quantity,
                })
                .await;
        }

        if let Some((old_status, new_status)) = outcome.status_change {
            if old_status != new_status {
                if let Some(po_id) = outcome.invoice.po_header_id {
                    event_sender
                        .send_or_log(Event::PurchaseOrderStatusChanged {
                            po_id,
                            old_status: old_status.to_string(),
                            new_status: new_status.to_string(),
                        })
                        .await;
                }
            }
        }
    }
}
