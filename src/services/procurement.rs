use crate::{
    commands::purchaseorders::{
        CancelPurchaseOrderCommand, CancelPurchaseOrderResult, CreatePurchaseOrderCommand,
        CreatePurchaseOrderResult,
    },
    commands::Command,
    db::DbPool,
    entities::{
        purchase_order_headers::{self, PurchaseOrderStatus},
        purchase_order_lines,
    },
    errors::ServiceError,
    events::EventSender,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Service for managing purchase orders and their receipt ledger.
#[derive(Clone)]
pub struct ProcurementService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    home_state_code: String,
}

impl ProcurementService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, home_state_code: String) -> Self {
        Self {
            db,
            event_sender,
            home_state_code,
        }
    }

    /// Creates a new purchase order
    #[instrument(skip(self, command))]
    pub async fn create_purchase_order(
        &self,
        mut command: CreatePurchaseOrderCommand,
    ) -> Result<CreatePurchaseOrderResult, ServiceError> {
        command.home_state_code = self.home_state_code.clone();
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    /// Cancels a purchase order that has not been fully received
    #[instrument(skip(self))]
    pub async fn cancel_purchase_order(
        &self,
        command: CancelPurchaseOrderCommand,
    ) -> Result<CancelPurchaseOrderResult, ServiceError> {
        command
            .execute(self.db.clone(), self.event_sender.clone())
            .await
    }

    /// Gets a purchase order by ID
    #[instrument(skip(self))]
    pub async fn get_purchase_order(
        &self,
        po_id: Uuid,
    ) -> Result<Option<purchase_order_headers::Model>, ServiceError> {
        let po = purchase_order_headers::Entity::find_by_id(po_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(po)
    }

    /// Gets a purchase order together with its lines, ordered by line number
    #[instrument(skip(self))]
    pub async fn get_purchase_order_with_lines(
        &self,
        po_id: Uuid,
    ) -> Result<Option<(purchase_order_headers::Model, Vec<purchase_order_lines::Model>)>, ServiceError>
    {
        let Some(header) = self.get_purchase_order(po_id).await? else {
            return Ok(None);
        };

        let lines = purchase_order_lines::Entity::find()
            .filter(purchase_order_lines::Column::PoHeaderId.eq(po_id))
            .order_by_asc(purchase_order_lines::Column::LineNum)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(Some((header, lines)))
    }

    /// Gets purchase orders for a vendor
    #[instrument(skip(self))]
    pub async fn get_purchase_orders_by_vendor(
        &self,
        vendor_id: Uuid,
    ) -> Result<Vec<purchase_order_headers::Model>, ServiceError> {
        let pos = purchase_order_headers::Entity::find()
            .filter(purchase_order_headers::Column::VendorId.eq(vendor_id))
            .order_by_desc(purchase_order_headers::Column::OrderDate)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(pos)
    }

    /// Gets purchase orders by status
    #[instrument(skip(self))]
    pub async fn get_purchase_orders_by_status(
        &self,
        status: PurchaseOrderStatus,
    ) -> Result<Vec<purchase_order_headers::Model>, ServiceError> {
        let pos = purchase_order_headers::Entity::find()
            .filter(purchase_order_headers::Column::Status.eq(status))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(pos)
    }

    /// Gets purchase orders due for delivery within a date range
    #[instrument(skip(self))]
    pub async fn get_purchase_orders_by_delivery_date(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<purchase_order_headers::Model>, ServiceError> {
        let pos = purchase_order_headers::Entity::find()
            .filter(purchase_order_headers::Column::ExpectedDeliveryDate.gte(start_date))
            .filter(purchase_order_headers::Column::ExpectedDeliveryDate.lte(end_date))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(pos)
    }

    /// Gets the total value of purchase orders placed in a date range,
    /// excluding cancelled orders
    #[instrument(skip(self))]
    pub async fn get_total_purchase_value(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Decimal, ServiceError> {
        let pos = purchase_order_headers::Entity::find()
            .filter(purchase_order_headers::Column::OrderDate.gte(start_date))
            .filter(purchase_order_headers::Column::OrderDate.lte(end_date))
            .filter(purchase_order_headers::Column::Status.ne(PurchaseOrderStatus::Cancelled))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(pos.iter().map(|po| po.total_amount).sum())
    }

    /// Summarizes receipt progress for a purchase order from its line ledger
    #[instrument(skip(self))]
    pub async fn get_receipt_progress(
        &self,
        po_id: Uuid,
    ) -> Result<PoReceiptProgress, ServiceError> {
        let (_, lines) = self
            .get_purchase_order_with_lines(po_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", po_id)))?;

        let mut total_ordered = Decimal::ZERO;
        let mut total_received = Decimal::ZERO;
        for line in &lines {
            total_ordered += line.quantity;
            total_received += line.received_quantity;
        }

        let status = if total_received == Decimal::ZERO {
            "NOT_RECEIVED"
        } else if total_received < total_ordered {
            "PARTIALLY_RECEIVED"
        } else {
            "FULLY_RECEIVED"
        };

        Ok(PoReceiptProgress {
            po_id,
            total_ordered,
            total_received,
            remaining: total_ordered - total_received,
            status: status.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct PoReceiptProgress {
    pub po_id: Uuid,
    pub total_ordered: Decimal,
    pub total_received: Decimal,
    pub remaining: Decimal,
    pub status: String,
}
