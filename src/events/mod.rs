use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

/// Events emitted by the procurement core after a successful commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Purchase order events
    PurchaseOrderCreated(Uuid),
    PurchaseOrderCancelled(Uuid),
    PurchaseOrderStatusChanged {
        po_id: Uuid,
        old_status: String,
        new_status: String,
    },

    // Goods receipt events
    GoodsReceiptCreated {
        invoice_id: Uuid,
        po_id: Option<Uuid>,
    },
    InventoryBatchCreated {
        batch_id: Uuid,
        item_id: Uuid,
        quantity: Decimal,
    },

    // Payment events
    PaymentRecorded {
        payment_id: Uuid,
        invoice_id: Uuid,
        amount: Decimal,
    },
    PaymentReversed {
        payment_id: Uuid,
        invoice_id: Uuid,
        amount: Decimal,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging delivery failure instead of surfacing it.
    /// Used after a commit, where the write must not be unwound because a
    /// listener went away.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event.clone()).await {
            warn!(?event, error = %e, "event delivery failed");
        }
    }
}

/// Builds an event channel pair with the given buffer size.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}
