use crate::{
    db::DbPool,
    entities::inventory_batches,
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Inputs for creating one stock lot from one received invoice line.
#[derive(Debug, Clone)]
pub struct BatchAllocation {
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub purchase_rate: Decimal,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub received_date: NaiveDate,
    pub invoice_id: Uuid,
    pub invoice_line_id: Option<Uuid>,
    /// Used for generated batch numbers when the caller supplies none.
    pub invoice_number: String,
    pub line_num: i32,
}

/// Creates exactly one inventory batch on the caller's connection, so receipt
/// processing can run it inside its own transaction. Two receipts of the same
/// item always produce two batches; merging is downstream's business.
#[instrument(skip(conn, allocation), fields(item_id = %allocation.item_id))]
pub async fn allocate<C: ConnectionTrait>(
    conn: &C,
    allocation: BatchAllocation,
) -> Result<inventory_batches::Model, ServiceError> {
    if allocation.quantity <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Batch quantity must be positive".to_string(),
        ));
    }

    let batch_number = allocation
        .batch_number
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("{}-B{}", allocation.invoice_number, allocation.line_num));

    let now = Utc::now();
    let batch = inventory_batches::ActiveModel {
        id: Set(Uuid::new_v4()),
        item_id: Set(allocation.item_id),
        batch_number: Set(batch_number),
        quantity: Set(allocation.quantity),
        purchase_rate: Set(allocation.purchase_rate),
        expiry_date: Set(allocation.expiry_date),
        received_date: Set(allocation.received_date),
        source_invoice_id: Set(allocation.invoice_id),
        source_invoice_line_id: Set(allocation.invoice_line_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let saved = batch.insert(conn).await.map_err(ServiceError::db_error)?;

    info!(
        batch_id = %saved.id,
        batch_number = %saved.batch_number,
        quantity = %saved.quantity,
        "inventory batch created"
    );

    Ok(saved)
}

/// Read side of the batch store for downstream consumers.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
}

impl InventoryService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn get_batches_for_item(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<inventory_batches::Model>, ServiceError> {
        let batches = inventory_batches::Entity::find()
            .filter(inventory_batches::Column::ItemId.eq(item_id))
            .order_by_asc(inventory_batches::Column::ReceivedDate)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(batches)
    }

    #[instrument(skip(self))]
    pub async fn get_batches_for_invoice(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<inventory_batches::Model>, ServiceError> {
        let batches = inventory_batches::Entity::find()
            .filter(inventory_batches::Column::SourceInvoiceId.eq(invoice_id))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(batches)
    }
}
