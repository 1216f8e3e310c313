use crate::{
    commands::Command,
    db::DbPool,
    entities::purchase_order_headers::{self, PurchaseOrderStatus},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionError, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelPurchaseOrderCommand {
    pub id: Uuid,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelPurchaseOrderResult {
    pub id: Uuid,
    pub status: PurchaseOrderStatus,
}

#[async_trait::async_trait]
impl Command for CancelPurchaseOrderCommand {
    type Result = CancelPurchaseOrderResult;

    #[instrument(skip(self, db_pool, event_sender))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let id = self.id;

        let updated = db_pool
            .transaction::<_, purchase_order_headers::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let header = purchase_order_headers::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Purchase order {} not found", id))
                        })?;

                    match header.status {
                        PurchaseOrderStatus::Pending | PurchaseOrderStatus::Partial => {}
                        PurchaseOrderStatus::Received => {
                            return Err(ServiceError::InvalidOperation(
                                "Cannot cancel a fully received purchase order".to_string(),
                            ));
                        }
                        PurchaseOrderStatus::Cancelled => {
                            return Err(ServiceError::InvalidOperation(
                                "Purchase order is already cancelled".to_string(),
                            ));
                        }
                    }

                    let mut active: purchase_order_headers::ActiveModel = header.into();
                    active.status = Set(PurchaseOrderStatus::Cancelled);
                    active.updated_at = Set(Utc::now());

                    active.update(txn).await.map_err(ServiceError::db_error)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(
            purchase_order_id = %updated.id,
            reason = self.reason.as_deref().unwrap_or("-"),
            "purchase order cancelled"
        );

        event_sender
            .send_or_log(Event::PurchaseOrderCancelled(updated.id))
            .await;

        Ok(CancelPurchaseOrderResult {
            id: updated.id,
            status: updated.status,
        })
    }
}
