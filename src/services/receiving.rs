use crate::{
    commands::receiving::{CreateReceiptCommand, CreateReceiptResult},
    commands::Command,
    db::DbPool,
    entities::{
        purchase_invoice_lines,
        purchase_invoices::{self, PaymentStatus},
        purchase_order_headers::{self, PurchaseOrderStatus},
        purchase_order_lines,
    },
    errors::ServiceError,
    events::EventSender,
    services::handoff::ReceiveOrderHandoff,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for recording goods receipts and pre-filling them from orders.
#[derive(Clone)]
pub struct ReceivingService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    home_state_code: String,
    handoff: ReceiveOrderHandoff,
}

/// A receipt form pre-filled from a purchase order: one line per order line
/// with outstanding quantity, carrying the ordered rate and GST rate forward.
#[derive(Debug, Clone)]
pub struct ReceiptDraft {
    pub purchase_order_id: Uuid,
    pub vendor_id: Uuid,
    pub lines: Vec<ReceiptDraftLine>,
}

#[derive(Debug, Clone)]
pub struct ReceiptDraftLine {
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit_rate: Decimal,
    pub gst_rate: Decimal,
}

impl ReceivingService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        home_state_code: String,
        handoff: ReceiveOrderHandoff,
    ) -> Self {
        Self {
            db,
            event_sender,
            home_state_code,
            handoff,
        }
    }

    /// Records a goods receipt (purchase invoice)
    #[instrument(skip(self, command))]
    pub async fn create_receipt(
        &self,
        mut command: CreateReceiptCommand,
    ) -> Result<CreateReceiptResult, ServiceError> {
        command.home_state_code = self.home_state_code.clone();
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    /// Publishes "receive this order" intent for the receipt flow to pick up.
    /// Rejects orders that cannot take another receipt.
    #[instrument(skip(self))]
    pub async fn start_receiving(&self, po_id: Uuid) -> Result<(), ServiceError> {
        let header = purchase_order_headers::Entity::find_by_id(po_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", po_id)))?;

        match header.status {
            PurchaseOrderStatus::Pending | PurchaseOrderStatus::Partial => {}
            PurchaseOrderStatus::Received => {
                return Err(ServiceError::InvalidOperation(
                    "Purchase order is already fully received".to_string(),
                ));
            }
            PurchaseOrderStatus::Cancelled => {
                return Err(ServiceError::InvalidOperation(
                    "Cannot receive against a cancelled purchase order".to_string(),
                ));
            }
        }

        if let Some(displaced) = self.handoff.publish(po_id) {
            info!(displaced_po_id = %displaced, "unread receive intent replaced");
        }

        Ok(())
    }

    /// Consumes the pending receive intent, if any, and turns it into a
    /// pre-filled receipt draft. The intent is cleared by this read.
    #[instrument(skip(self))]
    pub async fn next_receipt_draft(&self) -> Result<Option<ReceiptDraft>, ServiceError> {
        let Some(po_id) = self.handoff.consume_once() else {
            return Ok(None);
        };

        let header = purchase_order_headers::Entity::find_by_id(po_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", po_id)))?;

        let lines = purchase_order_lines::Entity::find()
            .filter(purchase_order_lines::Column::PoHeaderId.eq(po_id))
            .order_by_asc(purchase_order_lines::Column::LineNum)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        let draft_lines = lines
            .iter()
            .filter(|line| line.outstanding_quantity() > Decimal::ZERO)
            .map(|line| ReceiptDraftLine {
                item_id: line.item_id,
                item_name: line.item_name.clone(),
                quantity: line.outstanding_quantity(),
                unit_rate: line.unit_rate,
                gst_rate: line.gst_rate,
            })
            .collect();

        Ok(Some(ReceiptDraft {
            purchase_order_id: header.id,
            vendor_id: header.vendor_id,
            lines: draft_lines,
        }))
    }

    /// Gets a purchase invoice by ID
    #[instrument(skip(self))]
    pub async fn get_invoice(
        &self,
        invoice_id: Uuid,
    ) -> Result<Option<purchase_invoices::Model>, ServiceError> {
        let invoice = purchase_invoices::Entity::find_by_id(invoice_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(invoice)
    }

    /// Gets a purchase invoice together with its lines
    #[instrument(skip(self))]
    pub async fn get_invoice_with_lines(
        &self,
        invoice_id: Uuid,
    ) -> Result<Option<(purchase_invoices::Model, Vec<purchase_invoice_lines::Model>)>, ServiceError>
    {
        let Some(invoice) = self.get_invoice(invoice_id).await? else {
            return Ok(None);
        };

        let lines = purchase_invoice_lines::Entity::find()
            .filter(purchase_invoice_lines::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(purchase_invoice_lines::Column::LineNum)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(Some((invoice, lines)))
    }

    /// Gets invoices recorded against a purchase order
    #[instrument(skip(self))]
    pub async fn get_invoices_for_order(
        &self,
        po_id: Uuid,
    ) -> Result<Vec<purchase_invoices::Model>, ServiceError> {
        let invoices = purchase_invoices::Entity::find()
            .filter(purchase_invoices::Column::PoHeaderId.eq(po_id))
            .order_by_asc(purchase_invoices::Column::ReceivedDate)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(invoices)
    }

    /// Gets invoices for a registered vendor
    #[instrument(skip(self))]
    pub async fn get_invoices_by_vendor(
        &self,
        vendor_id: Uuid,
    ) -> Result<Vec<purchase_invoices::Model>, ServiceError> {
        let invoices = purchase_invoices::Entity::find()
            .filter(purchase_invoices::Column::VendorId.eq(vendor_id))
            .order_by_desc(purchase_invoices::Column::InvoiceDate)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(invoices)
    }

    /// Gets invoices by payment status
    #[instrument(skip(self))]
    pub async fn get_invoices_by_payment_status(
        &self,
        status: PaymentStatus,
    ) -> Result<Vec<purchase_invoices::Model>, ServiceError> {
        let invoices = purchase_invoices::Entity::find()
            .filter(purchase_invoices::Column::PaymentStatus.eq(status))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(invoices)
    }
}
