//! Back-office procurement core.
//!
//! Keeps three linked documents — purchase orders, goods receipts (purchase
//! invoices), and payments — mutually consistent as partial receipts and
//! partial payments accumulate, with GST (CGST/SGST/IGST) tax math shared by
//! every document.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod logging;
pub mod migrator;
pub mod services;
pub mod tax;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::handoff::ReceiveOrderHandoff;
use crate::services::inventory::InventoryService;
use crate::services::payments::PaymentService;
use crate::services::procurement::ProcurementService;
use crate::services::receiving::ReceivingService;
use crate::services::vendors::VendorService;

/// Composition root: the wired service set over one connection pool and one
/// event channel.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub event_sender: Arc<EventSender>,
    pub vendors: VendorService,
    pub procurement: ProcurementService,
    pub receiving: ReceivingService,
    pub inventory: InventoryService,
    pub payments: PaymentService,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig, event_sender: EventSender) -> Self {
        let event_sender = Arc::new(event_sender);
        let handoff = ReceiveOrderHandoff::new();

        Self {
            vendors: VendorService::new(db.clone()),
            procurement: ProcurementService::new(
                db.clone(),
                event_sender.clone(),
                config.home_state_code.clone(),
            ),
            receiving: ReceivingService::new(
                db.clone(),
                event_sender.clone(),
                config.home_state_code.clone(),
                handoff,
            ),
            inventory: InventoryService::new(db.clone()),
            payments: PaymentService::new(db.clone(), event_sender.clone()),
            db,
            config,
            event_sender,
        }
    }
}
