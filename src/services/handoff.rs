//! Single-slot relay carrying "receive this purchase order" intent from the
//! order view to the receipt-creation flow.
//!
//! Last write wins: publishing over an unread slot replaces it. Reading
//! consumes: the slot is cleared atomically with the read, so one intent can
//! never fan out into two receipt flows.

use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct ReceiveOrderHandoff {
    slot: Arc<Mutex<Option<Uuid>>>,
}

impl ReceiveOrderHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an intent, returning the unread one it displaced, if any.
    pub fn publish(&self, po_id: Uuid) -> Option<Uuid> {
        self.slot.lock().unwrap().replace(po_id)
    }

    /// Takes and clears the pending intent in one step.
    pub fn consume_once(&self) -> Option<Uuid> {
        self.slot.lock().unwrap().take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().unwrap().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_returns_published_intent_and_clears() {
        let handoff = ReceiveOrderHandoff::new();
        let po_id = Uuid::new_v4();

        assert!(handoff.publish(po_id).is_none());
        assert_eq!(handoff.consume_once(), Some(po_id));
        assert_eq!(handoff.consume_once(), None);
        assert!(handoff.is_empty());
    }

    #[test]
    fn later_publish_overwrites_unread_intent() {
        let handoff = ReceiveOrderHandoff::new();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        handoff.publish(first);
        assert_eq!(handoff.publish(second), Some(first));
        assert_eq!(handoff.consume_once(), Some(second));
    }

    #[test]
    fn clones_share_the_slot() {
        let handoff = ReceiveOrderHandoff::new();
        let reader = handoff.clone();
        let po_id = Uuid::new_v4();

        handoff.publish(po_id);
        assert_eq!(reader.consume_once(), Some(po_id));
        assert!(handoff.is_empty());
    }
}
