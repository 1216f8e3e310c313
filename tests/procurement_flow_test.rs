mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use procurement_api::{
    commands::purchaseorders::{
        CancelPurchaseOrderCommand, CreatePurchaseOrderCommand, CreatePurchaseOrderResult,
        PurchaseOrderLineRequest,
    },
    commands::receiving::{CreateReceiptCommand, ReceiptLineRequest},
    entities::purchase_order_headers::PurchaseOrderStatus,
    errors::ServiceError,
    events::Event,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::TestApp;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn order_command(vendor_id: Uuid, item_id: Uuid) -> CreatePurchaseOrderCommand {
    CreatePurchaseOrderCommand {
        vendor_id,
        order_date: date(2024, 3, 1),
        expected_delivery_date: Some(date(2024, 3, 10)),
        lines: vec![PurchaseOrderLineRequest {
            item_id,
            item_name: "Paracetamol 500mg".to_string(),
            quantity: dec!(10),
            unit_rate: dec!(100),
            gst_rate: dec!(18),
        }],
        notes: None,
        home_state_code: String::new(),
    }
}

fn receipt_command(
    vendor_id: Uuid,
    po_id: Option<Uuid>,
    item_id: Uuid,
    quantity: Decimal,
) -> CreateReceiptCommand {
    CreateReceiptCommand {
        vendor_id: Some(vendor_id),
        vendor_name: None,
        invoice_number: "INV-1001".to_string(),
        invoice_date: date(2024, 3, 5),
        received_date: date(2024, 3, 6),
        purchase_order_id: po_id,
        lines: vec![ReceiptLineRequest {
            item_id,
            item_name: "Paracetamol 500mg".to_string(),
            batch_number: Some("PCM-B42".to_string()),
            expiry_date: Some(date(2026, 3, 1)),
            quantity,
            unit_rate: dec!(100),
            gst_rate: dec!(18),
        }],
        other_charges: None,
        rounding: None,
        notes: None,
        home_state_code: String::new(),
    }
}

async fn seeded_order(app: &TestApp, state_code: &str) -> (Uuid, Uuid, CreatePurchaseOrderResult) {
    let vendor = app.seed_vendor("Arogya Pharma", state_code).await;
    let item_id = Uuid::new_v4();
    let po = app
        .state
        .procurement
        .create_purchase_order(order_command(vendor.id, item_id))
        .await
        .expect("create purchase order");
    (vendor.id, item_id, po)
}

#[tokio::test]
async fn intrastate_order_splits_gst_and_starts_pending() {
    // 10 × 100 @ 18% from a same-state vendor.
    let app = TestApp::new().await;
    let (_, _, po) = seeded_order(&app, common::HOME_STATE).await;

    assert_eq!(po.subtotal, dec!(1000));
    assert_eq!(po.cgst, dec!(90));
    assert_eq!(po.sgst, dec!(90));
    assert_eq!(po.igst, dec!(0));
    assert_eq!(po.total_amount, dec!(1180));
    assert_eq!(po.status, PurchaseOrderStatus::Pending);

    let (header, lines) = app
        .state
        .procurement
        .get_purchase_order_with_lines(po.id)
        .await
        .expect("query order")
        .expect("order exists");
    assert_eq!(header.status, PurchaseOrderStatus::Pending);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].received_quantity, dec!(0));
    assert_eq!(lines[0].line_amount, dec!(1180));
}

#[tokio::test]
async fn interstate_order_carries_igst_with_identical_total() {
    // Same line as above, out-of-state vendor.
    let app = TestApp::new().await;
    let (_, _, po) = seeded_order(&app, "MH").await;

    assert_eq!(po.cgst, dec!(0));
    assert_eq!(po.sgst, dec!(0));
    assert_eq!(po.igst, dec!(180));
    assert_eq!(po.total_amount, dec!(1180));
}

#[tokio::test]
async fn partial_receipt_updates_ledger_and_creates_batch() {
    // receive 6 of 10.
    let mut app = TestApp::new().await;
    let (vendor_id, item_id, po) = seeded_order(&app, common::HOME_STATE).await;
    app.drain_events();

    let receipt = app
        .state
        .receiving
        .create_receipt(receipt_command(vendor_id, Some(po.id), item_id, dec!(6)))
        .await
        .expect("create receipt");

    assert_eq!(receipt.subtotal, dec!(600));
    assert_eq!(receipt.cgst, dec!(54));
    assert_eq!(receipt.sgst, dec!(54));
    assert_eq!(receipt.total_amount, dec!(708));
    assert_eq!(receipt.order_status, Some(PurchaseOrderStatus::Partial));
    assert_eq!(receipt.batch_ids.len(), 1);

    let (header, lines) = app
        .state
        .procurement
        .get_purchase_order_with_lines(po.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(header.status, PurchaseOrderStatus::Partial);
    assert_eq!(lines[0].received_quantity, dec!(6));

    let batches = app
        .state
        .inventory
        .get_batches_for_invoice(receipt.invoice_id)
        .await
        .unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].quantity, dec!(6));
    assert_eq!(batches[0].batch_number, "PCM-B42");
    assert_eq!(batches[0].item_id, item_id);

    let events = app.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::GoodsReceiptCreated { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::PurchaseOrderStatusChanged { .. })));
}

#[tokio::test]
async fn receiving_the_remainder_completes_the_order() {
    // Receive 6, then the remaining 4.
    let app = TestApp::new().await;
    let (vendor_id, item_id, po) = seeded_order(&app, common::HOME_STATE).await;

    app.state
        .receiving
        .create_receipt(receipt_command(vendor_id, Some(po.id), item_id, dec!(6)))
        .await
        .expect("first receipt");

    let mut second = receipt_command(vendor_id, Some(po.id), item_id, dec!(4));
    second.invoice_number = "INV-1002".to_string();
    let receipt = app
        .state
        .receiving
        .create_receipt(second)
        .await
        .expect("second receipt");

    assert_eq!(receipt.order_status, Some(PurchaseOrderStatus::Received));

    let progress = app
        .state
        .procurement
        .get_receipt_progress(po.id)
        .await
        .unwrap();
    assert_eq!(progress.total_ordered, dec!(10));
    assert_eq!(progress.total_received, dec!(10));
    assert_eq!(progress.remaining, dec!(0));
    assert_eq!(progress.status, "FULLY_RECEIVED");
}

#[tokio::test]
async fn over_receiving_is_rejected_without_partial_state() {
    let app = TestApp::new().await;
    let (vendor_id, item_id, po) = seeded_order(&app, common::HOME_STATE).await;

    app.state
        .receiving
        .create_receipt(receipt_command(vendor_id, Some(po.id), item_id, dec!(6)))
        .await
        .expect("first receipt");

    let mut over = receipt_command(vendor_id, Some(po.id), item_id, dec!(5));
    over.invoice_number = "INV-1002".to_string();
    let result = app.state.receiving.create_receipt(over).await;
    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));

    // The rejected receipt must leave nothing behind.
    let invoices = app
        .state
        .receiving
        .get_invoices_for_order(po.id)
        .await
        .unwrap();
    assert_eq!(invoices.len(), 1);

    let batches = app
        .state
        .inventory
        .get_batches_for_item(item_id)
        .await
        .unwrap();
    assert_eq!(batches.len(), 1);

    let (header, lines) = app
        .state
        .procurement
        .get_purchase_order_with_lines(po.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lines[0].received_quantity, dec!(6));
    assert_eq!(header.status, PurchaseOrderStatus::Partial);
}

#[tokio::test]
async fn receipt_line_must_match_an_order_line() {
    let app = TestApp::new().await;
    let (vendor_id, _, po) = seeded_order(&app, common::HOME_STATE).await;

    let stranger = Uuid::new_v4();
    let result = app
        .state
        .receiving
        .create_receipt(receipt_command(vendor_id, Some(po.id), stranger, dec!(1)))
        .await;

    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn unregistered_purchase_defaults_to_intrastate() {
    let app = TestApp::new().await;
    let item_id = Uuid::new_v4();

    let mut command = receipt_command(Uuid::new_v4(), None, item_id, dec!(6));
    command.vendor_id = None;
    command.vendor_name = Some("Roadside Traders".to_string());
    command.lines[0].batch_number = None;

    let receipt = app
        .state
        .receiving
        .create_receipt(command)
        .await
        .expect("ad-hoc receipt");

    assert_eq!(receipt.cgst, dec!(54));
    assert_eq!(receipt.sgst, dec!(54));
    assert_eq!(receipt.igst, dec!(0));
    assert_eq!(receipt.purchase_order_id, None);

    // Batch number falls back to one scoped to the invoice.
    let batches = app
        .state
        .inventory
        .get_batches_for_invoice(receipt.invoice_id)
        .await
        .unwrap();
    assert_eq!(batches[0].batch_number, "INV-1001-B1");
}

#[tokio::test]
async fn receipt_requires_vendor_lines_and_invoice_number() {
    let app = TestApp::new().await;
    let item_id = Uuid::new_v4();

    let mut missing_vendor = receipt_command(Uuid::new_v4(), None, item_id, dec!(1));
    missing_vendor.vendor_id = None;
    missing_vendor.vendor_name = Some("   ".to_string());
    assert_matches!(
        app.state.receiving.create_receipt(missing_vendor).await,
        Err(ServiceError::ValidationError(_))
    );

    let vendor = app.seed_vendor("Arogya Pharma", common::HOME_STATE).await;

    let mut no_lines = receipt_command(vendor.id, None, item_id, dec!(1));
    no_lines.lines.clear();
    assert_matches!(
        app.state.receiving.create_receipt(no_lines).await,
        Err(ServiceError::ValidationError(_))
    );

    let mut blank_number = receipt_command(vendor.id, None, item_id, dec!(1));
    blank_number.invoice_number = String::new();
    assert_matches!(
        app.state.receiving.create_receipt(blank_number).await,
        Err(ServiceError::ValidationError(_))
    );

    let zero_quantity = receipt_command(vendor.id, None, item_id, dec!(0));
    assert_matches!(
        app.state.receiving.create_receipt(zero_quantity).await,
        Err(ServiceError::ValidationError(_))
    );
}

#[tokio::test]
async fn cancelled_order_accepts_no_receipts() {
    let app = TestApp::new().await;
    let (vendor_id, item_id, po) = seeded_order(&app, common::HOME_STATE).await;

    app.state
        .procurement
        .cancel_purchase_order(CancelPurchaseOrderCommand {
            id: po.id,
            reason: Some("vendor discontinued".to_string()),
        })
        .await
        .expect("cancel order");

    let result = app
        .state
        .receiving
        .create_receipt(receipt_command(vendor_id, Some(po.id), item_id, dec!(1)))
        .await;
    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn fully_received_order_cannot_be_cancelled() {
    let app = TestApp::new().await;
    let (vendor_id, item_id, po) = seeded_order(&app, common::HOME_STATE).await;

    app.state
        .receiving
        .create_receipt(receipt_command(vendor_id, Some(po.id), item_id, dec!(10)))
        .await
        .expect("receive everything");

    let result = app
        .state
        .procurement
        .cancel_purchase_order(CancelPurchaseOrderCommand {
            id: po.id,
            reason: None,
        })
        .await;
    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));
}

#[tokio::test]
async fn handoff_prefills_outstanding_quantities_and_consumes_once() {
    let app = TestApp::new().await;
    let (vendor_id, item_id, po) = seeded_order(&app, common::HOME_STATE).await;

    app.state
        .receiving
        .create_receipt(receipt_command(vendor_id, Some(po.id), item_id, dec!(6)))
        .await
        .expect("partial receipt");

    app.state
        .receiving
        .start_receiving(po.id)
        .await
        .expect("publish receive intent");

    let draft = app
        .state
        .receiving
        .next_receipt_draft()
        .await
        .expect("draft query")
        .expect("intent pending");

    assert_eq!(draft.purchase_order_id, po.id);
    assert_eq!(draft.vendor_id, vendor_id);
    assert_eq!(draft.lines.len(), 1);
    assert_eq!(draft.lines[0].item_id, item_id);
    assert_eq!(draft.lines[0].quantity, dec!(4));
    assert_eq!(draft.lines[0].unit_rate, dec!(100));
    assert_eq!(draft.lines[0].gst_rate, dec!(18));

    // Consume-once: the intent must not replay into a second flow.
    assert!(app
        .state
        .receiving
        .next_receipt_draft()
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn handoff_rejects_orders_with_nothing_left_to_receive() {
    let app = TestApp::new().await;
    let (vendor_id, item_id, po) = seeded_order(&app, common::HOME_STATE).await;

    app.state
        .receiving
        .create_receipt(receipt_command(vendor_id, Some(po.id), item_id, dec!(10)))
        .await
        .expect("receive everything");

    assert_matches!(
        app.state.receiving.start_receiving(po.id).await,
        Err(ServiceError::InvalidOperation(_))
    );
}

#[tokio::test]
async fn purchase_value_sums_open_orders_in_range() {
    let app = TestApp::new().await;
    let (vendor_id, _, po) = seeded_order(&app, common::HOME_STATE).await;

    // A second, cancelled order must not count.
    let other = app
        .state
        .procurement
        .create_purchase_order(order_command(vendor_id, Uuid::new_v4()))
        .await
        .unwrap();
    app.state
        .procurement
        .cancel_purchase_order(CancelPurchaseOrderCommand {
            id: other.id,
            reason: None,
        })
        .await
        .unwrap();

    let total = app
        .state
        .procurement
        .get_total_purchase_value(date(2024, 3, 1), date(2024, 3, 31))
        .await
        .unwrap();
    assert_eq!(total, po.total_amount);

    let due = app
        .state
        .procurement
        .get_purchase_orders_by_delivery_date(date(2024, 3, 1), date(2024, 3, 31))
        .await
        .unwrap();
    assert_eq!(due.len(), 2);
}
