pub mod cancel_purchase_order_command;
pub mod create_purchase_order_command;

pub use cancel_purchase_order_command::{CancelPurchaseOrderCommand, CancelPurchaseOrderResult};
pub use create_purchase_order_command::{
    CreatePurchaseOrderCommand, CreatePurchaseOrderResult, PurchaseOrderLineRequest,
};
