mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use procurement_api::{
    commands::payments::{RecordPaymentCommand, ReversePaymentCommand},
    commands::receiving::{CreateReceiptCommand, ReceiptLineRequest},
    entities::{purchase_invoices::PaymentStatus, purchase_payments::PaymentMethod},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use common::TestApp;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Records an ad-hoc receipt worth 708 (600 + 18% GST) and returns its id.
async fn seeded_invoice(app: &TestApp) -> Uuid {
    let vendor = app.seed_vendor("Arogya Pharma", common::HOME_STATE).await;
    let receipt = app
        .state
        .receiving
        .create_receipt(CreateReceiptCommand {
            vendor_id: Some(vendor.id),
            vendor_name: None,
            invoice_number: "INV-2001".to_string(),
            invoice_date: date(2024, 3, 5),
            received_date: date(2024, 3, 6),
            purchase_order_id: None,
            lines: vec![ReceiptLineRequest {
                item_id: Uuid::new_v4(),
                item_name: "Paracetamol 500mg".to_string(),
                batch_number: None,
                expiry_date: None,
                quantity: dec!(6),
                unit_rate: dec!(100),
                gst_rate: dec!(18),
            }],
            other_charges: None,
            rounding: None,
            notes: None,
            home_state_code: String::new(),
        })
        .await
        .expect("create invoice");

    assert_eq!(receipt.total_amount, dec!(708));
    receipt.invoice_id
}

fn payment(invoice_id: Uuid, amount: Decimal) -> RecordPaymentCommand {
    RecordPaymentCommand {
        invoice_id,
        payment_date: date(2024, 3, 8),
        amount,
        method: PaymentMethod::Upi,
        reference_number: None,
        notes: None,
    }
}

/// Asserts the ledger invariants: pending == total - paid and paid equals the
/// sum of the payment rows that currently exist.
async fn assert_ledger_consistent(app: &TestApp, invoice_id: Uuid) {
    let invoice = app
        .state
        .receiving
        .get_invoice(invoice_id)
        .await
        .unwrap()
        .expect("invoice exists");
    let payments = app
        .state
        .payments
        .get_payments_for_invoice(invoice_id)
        .await
        .unwrap();

    let recorded: Decimal = payments.iter().map(|p| p.amount).sum();
    assert_eq!(invoice.paid_amount, recorded);
    assert_eq!(invoice.pending_amount, invoice.total_amount - invoice.paid_amount);
}

#[tokio::test]
async fn partial_then_full_payment_settles_the_invoice() {
    // 500 then 208 against a 708 invoice.
    let app = TestApp::new().await;
    let invoice_id = seeded_invoice(&app).await;

    let first = app
        .state
        .payments
        .record_payment(payment(invoice_id, dec!(500)))
        .await
        .expect("first payment");
    assert_eq!(first.paid_amount, dec!(500));
    assert_eq!(first.pending_amount, dec!(208));
    assert_eq!(first.payment_status, PaymentStatus::Partial);

    let second = app
        .state
        .payments
        .record_payment(payment(invoice_id, dec!(208)))
        .await
        .expect("second payment");
    assert_eq!(second.paid_amount, dec!(708));
    assert_eq!(second.pending_amount, dec!(0));
    assert_eq!(second.payment_status, PaymentStatus::Paid);

    assert_ledger_consistent(&app, invoice_id).await;
}

#[tokio::test]
async fn reversing_a_payment_restores_the_previous_state() {
    // Delete the settling payment; the invoice must fall back to partial.
    let app = TestApp::new().await;
    let invoice_id = seeded_invoice(&app).await;

    app.state
        .payments
        .record_payment(payment(invoice_id, dec!(500)))
        .await
        .unwrap();
    let second = app
        .state
        .payments
        .record_payment(payment(invoice_id, dec!(208)))
        .await
        .unwrap();

    let reversed = app
        .state
        .payments
        .reverse_payment(ReversePaymentCommand {
            payment_id: second.payment_id,
        })
        .await
        .expect("reverse payment");

    assert_eq!(reversed.reversed_amount, dec!(208));
    assert_eq!(reversed.paid_amount, dec!(500));
    assert_eq!(reversed.pending_amount, dec!(208));
    assert_eq!(reversed.payment_status, PaymentStatus::Partial);

    assert_ledger_consistent(&app, invoice_id).await;
}

#[tokio::test]
async fn overpayment_and_non_positive_amounts_are_rejected() {
    let app = TestApp::new().await;
    let invoice_id = seeded_invoice(&app).await;

    assert_matches!(
        app.state
            .payments
            .record_payment(payment(invoice_id, dec!(1000)))
            .await,
        Err(ServiceError::ValidationError(_))
    );
    assert_matches!(
        app.state
            .payments
            .record_payment(payment(invoice_id, dec!(0)))
            .await,
        Err(ServiceError::ValidationError(_))
    );
    assert_matches!(
        app.state
            .payments
            .record_payment(payment(invoice_id, dec!(-50)))
            .await,
        Err(ServiceError::ValidationError(_))
    );

    // Nothing was written.
    let payments = app
        .state
        .payments
        .get_payments_for_invoice(invoice_id)
        .await
        .unwrap();
    assert!(payments.is_empty());
    assert_ledger_consistent(&app, invoice_id).await;
}

#[tokio::test]
async fn paying_the_exact_pending_amount_after_a_partial_is_allowed() {
    let app = TestApp::new().await;
    let invoice_id = seeded_invoice(&app).await;

    app.state
        .payments
        .record_payment(payment(invoice_id, dec!(700)))
        .await
        .unwrap();

    // One rupee over the remainder must fail, the exact remainder succeed.
    assert_matches!(
        app.state
            .payments
            .record_payment(payment(invoice_id, dec!(9)))
            .await,
        Err(ServiceError::ValidationError(_))
    );
    let settled = app
        .state
        .payments
        .record_payment(payment(invoice_id, dec!(8)))
        .await
        .unwrap();
    assert_eq!(settled.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn ledger_survives_an_arbitrary_record_reverse_sequence() {
    let app = TestApp::new().await;
    let invoice_id = seeded_invoice(&app).await;

    let first = app
        .state
        .payments
        .record_payment(payment(invoice_id, dec!(100)))
        .await
        .unwrap();
    app.state
        .payments
        .record_payment(payment(invoice_id, dec!(200)))
        .await
        .unwrap();
    app.state
        .payments
        .reverse_payment(ReversePaymentCommand {
            payment_id: first.payment_id,
        })
        .await
        .unwrap();
    let last = app
        .state
        .payments
        .record_payment(payment(invoice_id, dec!(50)))
        .await
        .unwrap();

    assert_eq!(last.paid_amount, dec!(250));
    assert_eq!(last.pending_amount, dec!(458));
    assert_eq!(last.payment_status, PaymentStatus::Partial);
    assert_ledger_consistent(&app, invoice_id).await;
}

#[tokio::test]
async fn unknown_invoice_and_payment_references_are_rejected() {
    let app = TestApp::new().await;
    let _ = seeded_invoice(&app).await;

    assert_matches!(
        app.state
            .payments
            .record_payment(payment(Uuid::new_v4(), dec!(10)))
            .await,
        Err(ServiceError::NotFound(_))
    );
    assert_matches!(
        app.state
            .payments
            .reverse_payment(ReversePaymentCommand {
                payment_id: Uuid::new_v4(),
            })
            .await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn reversal_of_every_payment_returns_the_invoice_to_pending() {
    let app = TestApp::new().await;
    let invoice_id = seeded_invoice(&app).await;

    let only = app
        .state
        .payments
        .record_payment(payment(invoice_id, dec!(708)))
        .await
        .unwrap();
    assert_eq!(only.payment_status, PaymentStatus::Paid);

    let reversed = app
        .state
        .payments
        .reverse_payment(ReversePaymentCommand {
            payment_id: only.payment_id,
        })
        .await
        .unwrap();
    assert_eq!(reversed.paid_amount, dec!(0));
    assert_eq!(reversed.pending_amount, dec!(708));
    assert_eq!(reversed.payment_status, PaymentStatus::Pending);

    assert_ledger_consistent(&app, invoice_id).await;
}
