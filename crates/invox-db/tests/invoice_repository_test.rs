//! Integration tests for the SurrealDB invoice repository.

use invox_core::InvoxError;
use invox_core::models::invoice::{CreateInvoice, CreateInvoiceLine};
use invox_core::repository::InvoiceRepository;
use invox_db::repository::SurrealInvoiceRepository;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

async fn setup() -> SurrealInvoiceRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    invox_db::run_migrations(&db).await.unwrap();

    SurrealInvoiceRepository::new(db)
}

fn header(owner_id: i64, total: &str) -> CreateInvoice {
    CreateInvoice {
        owner_id,
        total: dec(total),
        customer_name: "Carla Buyer".into(),
        customer_document: None,
        customer_email: Some("carla@example.com".into()),
    }
}

fn lines() -> Vec<CreateInvoiceLine> {
    vec![
        CreateInvoiceLine {
            product: "Widget".into(),
            unit_price: dec("2.50"),
            quantity: 3,
        },
        CreateInvoiceLine {
            product: "Gadget".into(),
            unit_price: dec("5.00"),
            quantity: 1,
        },
    ]
}

#[tokio::test]
async fn create_with_lines_roundtrip() {
    let repo = setup().await;

    let invoice = repo
        .create_with_lines(header(1, "12.50"), lines())
        .await
        .unwrap();

    assert_eq!(invoice.id, 1);
    assert_eq!(invoice.owner_id, 1);
    assert_eq!(invoice.total, dec("12.50"));
    assert_eq!(invoice.customer_name, "Carla Buyer");

    let stored = repo.lines_by_invoice(invoice.id).await.unwrap();
    assert_eq!(stored.len(), 2);

    // Subtotals come from the write path, in insertion order.
    assert_eq!(stored[0].product, "Widget");
    assert_eq!(stored[0].unit_price, dec("2.50"));
    assert_eq!(stored[0].quantity, 3);
    assert_eq!(stored[0].subtotal, dec("7.50"));
    assert_eq!(stored[1].subtotal, dec("5.00"));

    for line in &stored {
        assert_eq!(line.invoice_id, invoice.id);
    }
}

#[tokio::test]
async fn header_and_line_sequences_are_independent() {
    let repo = setup().await;

    let first = repo
        .create_with_lines(header(1, "12.50"), lines())
        .await
        .unwrap();
    let second = repo
        .create_with_lines(header(1, "12.50"), lines())
        .await
        .unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    let stored = repo.lines_by_invoice(second.id).await.unwrap();
    let line_ids: Vec<i64> = stored.iter().map(|l| l.id).collect();
    assert_eq!(line_ids, vec![3, 4]);
}

#[tokio::test]
async fn get_missing_invoice_is_not_found() {
    let repo = setup().await;

    let err = repo.get_by_id(99).await.unwrap_err();
    assert!(matches!(err, InvoxError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn listings_by_owner() {
    let repo = setup().await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(
            repo.create_with_lines(header(7, "12.50"), lines())
                .await
                .unwrap()
                .id,
        );
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    repo.create_with_lines(header(8, "12.50"), lines())
        .await
        .unwrap();

    let plain = repo.list_by_owner(7).await.unwrap();
    let plain_ids: Vec<i64> = plain.iter().map(|i| i.id).collect();
    assert_eq!(plain_ids, ids);

    let newest = repo.list_by_owner_newest_first(7).await.unwrap();
    let newest_ids: Vec<i64> = newest.iter().map(|i| i.id).collect();
    assert_eq!(newest_ids, vec![ids[2], ids[1], ids[0]]);
}

#[tokio::test]
async fn delete_cascades_to_lines() {
    let repo = setup().await;

    let invoice = repo
        .create_with_lines(header(1, "12.50"), lines())
        .await
        .unwrap();
    assert_eq!(repo.lines_by_invoice(invoice.id).await.unwrap().len(), 2);

    repo.delete(invoice.id).await.unwrap();

    let err = repo.get_by_id(invoice.id).await.unwrap_err();
    assert!(matches!(err, InvoxError::NotFound { .. }), "got: {err:?}");
    assert!(repo.lines_by_invoice(invoice.id).await.unwrap().is_empty());
}
