//! Integration tests for the invoice issuance pipeline.

use invox_billing::config::BillingConfig;
use invox_billing::error::BillingError;
use invox_billing::service::{BillingService, IssueInvoice};
use invox_core::models::invoice::CartLine;
use invox_db::repository::SurrealInvoiceRepository;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Spin up the in-memory engine, run migrations, build the pipeline.
async fn setup_with(config: BillingConfig) -> BillingService<SurrealInvoiceRepository<Db>> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    invox_db::run_migrations(&db).await.unwrap();

    BillingService::new(SurrealInvoiceRepository::new(db), config)
}

async fn setup() -> BillingService<SurrealInvoiceRepository<Db>> {
    setup_with(BillingConfig::default()).await
}

fn two_line_cart() -> Vec<CartLine> {
    vec![
        CartLine {
            product: "Widget".into(),
            unit_price: dec("10.00"),
            quantity: 2,
        },
        CartLine {
            product: "Gadget".into(),
            unit_price: dec("5.00"),
            quantity: 1,
        },
    ]
}

fn issue_input(lines: Vec<CartLine>, claimed_total: &str) -> IssueInvoice {
    IssueInvoice {
        customer_name: "Carla Buyer".into(),
        customer_document: Some("87654321".into()),
        customer_email: Some("carla@example.com".into()),
        lines,
        claimed_total: dec(claimed_total),
    }
}

#[tokio::test]
async fn issue_persists_header_and_lines() {
    let svc = setup().await;

    let invoice_id = svc.issue(1, issue_input(two_line_cart(), "25.00")).await.unwrap();

    let invoice = svc.get_owned(invoice_id, 1).await.unwrap();
    assert_eq!(invoice.owner_id, 1);
    assert_eq!(invoice.total, dec("25.00"));
    assert_eq!(invoice.customer_name, "Carla Buyer");
    assert_eq!(invoice.customer_document.as_deref(), Some("87654321"));

    let lines = svc.get_lines(invoice_id).await.unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product, "Widget");
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[0].subtotal, dec("20.00"));
    assert_eq!(lines[1].product, "Gadget");
    assert_eq!(lines[1].subtotal, dec("5.00"));
}

#[tokio::test]
async fn subtotals_are_recomputed_regardless_of_claimed_total() {
    let svc = setup().await;

    // Claimed total is nowhere near the computed 25.00; the header
    // keeps the claimed value, the line subtotals do not.
    let invoice_id = svc.issue(1, issue_input(two_line_cart(), "999.99")).await.unwrap();

    let invoice = svc.get_owned(invoice_id, 1).await.unwrap();
    assert_eq!(invoice.total, dec("999.99"));

    let lines = svc.get_lines(invoice_id).await.unwrap();
    let subtotals: Vec<Decimal> = lines.iter().map(|l| l.subtotal).collect();
    assert_eq!(subtotals, vec![dec("20.00"), dec("5.00")]);
}

#[tokio::test]
async fn empty_cart_persists_nothing() {
    let svc = setup().await;

    let err = svc.issue(1, issue_input(Vec::new(), "0.00")).await.unwrap_err();
    assert!(matches!(err, BillingError::EmptyCart), "got: {err:?}");

    assert!(svc.list_by_owner(1, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn strict_totals_rejects_mismatch() {
    let svc = setup_with(BillingConfig {
        strict_totals: true,
    })
    .await;

    let err = svc.issue(1, issue_input(two_line_cart(), "24.00")).await.unwrap_err();
    assert!(
        matches!(err, BillingError::TotalMismatch { .. }),
        "got: {err:?}"
    );
    assert!(svc.list_by_owner(1, false).await.unwrap().is_empty());

    // An honest total still goes through under strict reconciliation.
    let invoice_id = svc.issue(1, issue_input(two_line_cart(), "25.00")).await.unwrap();
    assert_eq!(svc.get_owned(invoice_id, 1).await.unwrap().total, dec("25.00"));
}

#[tokio::test]
async fn get_owned_denies_foreign_invoices() {
    let svc = setup().await;

    let invoice_id = svc.issue(1, issue_input(two_line_cart(), "25.00")).await.unwrap();

    // The invoice exists, but not for this caller.
    let err = svc.get_owned(invoice_id, 2).await.unwrap_err();
    assert!(
        matches!(err, BillingError::NotFoundOrForbidden { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn get_owned_missing_invoice() {
    let svc = setup().await;

    let err = svc.get_owned(999, 1).await.unwrap_err();
    assert!(
        matches!(err, BillingError::NotFoundOrForbidden { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn newest_first_listing_is_descending() {
    let svc = setup().await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(svc.issue(7, issue_input(two_line_cart(), "25.00")).await.unwrap());
        // Creation timestamps must strictly increase for the order to
        // be observable.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let ordered = svc.list_by_owner(7, true).await.unwrap();
    let ordered_ids: Vec<i64> = ordered.iter().map(|i| i.id).collect();
    assert_eq!(ordered_ids, vec![ids[2], ids[1], ids[0]]);

    let plain = svc.list_by_owner(7, false).await.unwrap();
    let plain_ids: Vec<i64> = plain.iter().map(|i| i.id).collect();
    assert_eq!(plain_ids, ids);
}

#[tokio::test]
async fn listings_are_scoped_to_the_owner() {
    let svc = setup().await;

    svc.issue(1, issue_input(two_line_cart(), "25.00")).await.unwrap();
    svc.issue(2, issue_input(two_line_cart(), "25.00")).await.unwrap();

    assert_eq!(svc.list_by_owner(1, false).await.unwrap().len(), 1);
    assert_eq!(svc.list_by_owner(2, false).await.unwrap().len(), 1);
    assert!(svc.list_by_owner(3, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn single_line_scenario() {
    let svc = setup().await;

    let cart = vec![CartLine {
        product: "Consulting".into(),
        unit_price: dec("3.50"),
        quantity: 4,
    }];
    let invoice_id = svc.issue(1, issue_input(cart, "14.00")).await.unwrap();

    let invoice = svc.get_owned(invoice_id, 1).await.unwrap();
    assert_eq!(invoice.total, dec("14.00"));

    let lines = svc.get_lines(invoice_id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].subtotal, dec("14.00"));

    // A different identity cannot read it.
    assert!(svc.get_owned(invoice_id, 2).await.is_err());
}
