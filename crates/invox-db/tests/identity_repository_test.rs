//! Integration tests for the SurrealDB identity repository.

use invox_core::InvoxError;
use invox_core::models::identity::CreateIdentity;
use invox_core::repository::IdentityRepository;
use invox_db::repository::SurrealIdentityRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> SurrealIdentityRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    invox_db::run_migrations(&db).await.unwrap();

    SurrealIdentityRepository::new(db)
}

fn input(email: &str, document: Option<&str>) -> CreateIdentity {
    CreateIdentity {
        email: email.into(),
        secret_hash: "$argon2id$test-placeholder-hash".into(),
        given_name: "Alice".into(),
        family_name: "Vega".into(),
        document_number: document.map(Into::into),
    }
}

#[tokio::test]
async fn create_assigns_sequential_ids() {
    let repo = setup().await;

    let first = repo.create(input("a@example.com", None)).await.unwrap();
    let second = repo.create(input("b@example.com", None)).await.unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
}

#[tokio::test]
async fn create_then_get_roundtrip() {
    let repo = setup().await;

    let created = repo
        .create(input("alice@example.com", Some("12345678")))
        .await
        .unwrap();

    let by_id = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(by_id.email, "alice@example.com");
    assert_eq!(by_id.secret_hash, "$argon2id$test-placeholder-hash");
    assert_eq!(by_id.given_name, "Alice");
    assert_eq!(by_id.family_name, "Vega");
    assert_eq!(by_id.document_number.as_deref(), Some("12345678"));

    let by_email = repo.get_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.id, created.id);
}

#[tokio::test]
async fn get_missing_identity_is_not_found() {
    let repo = setup().await;

    let err = repo.get_by_id(42).await.unwrap_err();
    assert!(matches!(err, InvoxError::NotFound { .. }), "got: {err:?}");

    let err = repo.get_by_email("nobody@example.com").await.unwrap_err();
    assert!(matches!(err, InvoxError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn existence_checks() {
    let repo = setup().await;
    repo.create(input("alice@example.com", Some("12345678")))
        .await
        .unwrap();

    assert!(repo.exists_by_email("alice@example.com").await.unwrap());
    assert!(!repo.exists_by_email("bob@example.com").await.unwrap());

    assert!(repo.exists_by_document("12345678").await.unwrap());
    assert!(!repo.exists_by_document("00000000").await.unwrap());
}

#[tokio::test]
async fn duplicate_email_violates_unique_index() {
    let repo = setup().await;
    repo.create(input("alice@example.com", None)).await.unwrap();

    let err = repo
        .create(input("alice@example.com", None))
        .await
        .unwrap_err();
    assert!(matches!(err, InvoxError::Database(_)), "got: {err:?}");
}
