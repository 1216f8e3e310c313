pub mod inventory_batches;
pub mod purchase_invoice_lines;
pub mod purchase_invoices;
pub mod purchase_order_headers;
pub mod purchase_order_lines;
pub mod purchase_payments;
pub mod vendors;
