#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `SqliteStore`: covers the `StoreRepository` and
//! `DomainRepository` trait implementations.

use chrono::{Duration, TimeZone, Utc};
use voltz_checkout_app::adapters::SqliteStore;
use voltz_checkout_core::error::CoreError;
use voltz_checkout_core::traits::{DomainRepository, StoreRepository};
use voltz_checkout_core::types::{
    ActivationStepId, Domain, DomainHistoryEvent, DomainHistoryEventType, DomainStatus,
    DomainType, SslStatus, Store,
};

// ===== Helpers =====

async fn create_test_store() -> (SqliteStore, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = tmp.path().join("test.db");
    let store = SqliteStore::new(&db_path)
        .await
        .expect("failed to create SqliteStore");
    (store, tmp)
}

fn base_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn make_store(name: &str, offset_secs: i64) -> Store {
    Store::new(
        name.to_string(),
        false,
        base_time() + Duration::seconds(offset_secs),
    )
}

fn make_domain(store_id: &str, name: &str) -> Domain {
    Domain::new(store_id.to_string(), name.to_string(), base_time())
}

// ===== StoreRepository Tests =====

#[tokio::test]
async fn store_find_all_empty() {
    let (db, _tmp) = create_test_store().await;
    assert!(StoreRepository::find_all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn store_save_and_find() {
    let (db, _tmp) = create_test_store().await;
    let mut store = make_store("Loja", 0);
    store.status.billing = true;
    db.save(&store).await.unwrap();

    let found = StoreRepository::find_by_id(&db, &store.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, store);
}

#[tokio::test]
async fn store_find_by_id_missing() {
    let (db, _tmp) = create_test_store().await;
    assert!(StoreRepository::find_by_id(&db, "nope")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn store_find_all_oldest_first() {
    let (db, _tmp) = create_test_store().await;
    let newer = make_store("Nova", 60);
    let older = make_store("Antiga", 0);
    db.save(&newer).await.unwrap();
    db.save(&older).await.unwrap();

    let names: Vec<String> = StoreRepository::find_all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Antiga", "Nova"]);
}

#[tokio::test]
async fn store_save_upserts() {
    let (db, _tmp) = create_test_store().await;
    let mut store = make_store("Loja", 0);
    db.save(&store).await.unwrap();

    store.name = "Loja Renomeada".to_string();
    db.save(&store).await.unwrap();

    let all = StoreRepository::find_all(&db).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Loja Renomeada");
}

#[tokio::test]
async fn store_demo_flag_roundtrips() {
    let (db, _tmp) = create_test_store().await;
    let demo = Store::new("Loja Demo".to_string(), true, base_time());
    db.save(&demo).await.unwrap();

    let found = StoreRepository::find_by_id(&db, &demo.id)
        .await
        .unwrap()
        .unwrap();
    assert!(found.is_demo);
}

#[tokio::test]
async fn store_update_step() {
    let (db, _tmp) = create_test_store().await;
    let store = make_store("Loja", 0);
    db.save(&store).await.unwrap();

    db.update_step(&store.id, ActivationStepId::Gateway, true)
        .await
        .unwrap();
    db.update_step(&store.id, ActivationStepId::Shopify, true)
        .await
        .unwrap();
    db.update_step(&store.id, ActivationStepId::Shopify, false)
        .await
        .unwrap();

    let found = StoreRepository::find_by_id(&db, &store.id)
        .await
        .unwrap()
        .unwrap();
    assert!(found.status.gateway);
    assert!(!found.status.shopify);
    assert!(!found.status.billing);
    assert_eq!(found.name, "Loja");
}

#[tokio::test]
async fn store_update_step_missing() {
    let (db, _tmp) = create_test_store().await;
    let err = db
        .update_step("nope", ActivationStepId::Billing, true)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::StoreNotFound(_)));
}

#[tokio::test]
async fn store_delete() {
    let (db, _tmp) = create_test_store().await;
    let store = make_store("Loja", 0);
    db.save(&store).await.unwrap();

    StoreRepository::delete(&db, &store.id).await.unwrap();
    assert!(StoreRepository::find_by_id(&db, &store.id)
        .await
        .unwrap()
        .is_none());

    // 删除不存在的记录不报错
    StoreRepository::delete(&db, &store.id).await.unwrap();
}

// ===== DomainRepository Tests =====

#[tokio::test]
async fn domain_insert_and_find() {
    let (db, _tmp) = create_test_store().await;
    let domain = make_domain("store-1", "loja.com");
    db.insert(&domain).await.unwrap();

    let found = DomainRepository::find_by_id(&db, &domain.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, domain);
    assert_eq!(found.history.len(), 1);
    assert_eq!(found.status, DomainStatus::Pending);
}

#[tokio::test]
async fn domain_find_by_store_keeps_insertion_order() {
    let (db, _tmp) = create_test_store().await;
    for name in ["c.com", "a.com", "b.com"] {
        db.insert(&make_domain("store-1", name)).await.unwrap();
    }
    db.insert(&make_domain("store-2", "outra.com")).await.unwrap();

    let names: Vec<String> = db
        .find_by_store("store-1")
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["c.com", "a.com", "b.com"]);
}

#[tokio::test]
async fn domain_update_keeps_position_and_fields() {
    let (db, _tmp) = create_test_store().await;
    let mut first = make_domain("store-1", "a.com");
    let second = make_domain("store-1", "b.com");
    db.insert(&first).await.unwrap();
    db.insert(&second).await.unwrap();

    let checked = base_time() + Duration::minutes(5);
    first.domain_type = DomainType::Seguro;
    first.dns_verified = true;
    first.ssl_status = SslStatus::Active;
    first.status = DomainStatus::Active;
    first.last_checked = Some(checked);
    first.in_use = 3;
    first.history.push(DomainHistoryEvent::new(
        DomainHistoryEventType::DnsVerified,
        checked,
        None,
    ));
    first.history.push(DomainHistoryEvent::new(
        DomainHistoryEventType::SslIssued,
        checked,
        None,
    ));
    db.update(&first).await.unwrap();

    let domains = db.find_by_store("store-1").await.unwrap();
    assert_eq!(domains[0], first);
    assert_eq!(domains[1].id, second.id);
    assert_eq!(
        domains[0]
            .history
            .iter()
            .map(|e| e.event_type)
            .collect::<Vec<_>>(),
        vec![
            DomainHistoryEventType::Added,
            DomainHistoryEventType::DnsVerified,
            DomainHistoryEventType::SslIssued
        ]
    );
}

#[tokio::test]
async fn domain_update_missing() {
    let (db, _tmp) = create_test_store().await;
    let err = db
        .update(&make_domain("store-1", "ghost.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::DomainNotFound(_)));
}

#[tokio::test]
async fn domain_delete() {
    let (db, _tmp) = create_test_store().await;
    let domain = make_domain("store-1", "loja.com");
    db.insert(&domain).await.unwrap();

    assert!(DomainRepository::delete(&db, &domain.id).await.unwrap());
    assert!(!DomainRepository::delete(&db, &domain.id).await.unwrap());
    assert!(DomainRepository::find_by_id(&db, &domain.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn domain_delete_by_store() {
    let (db, _tmp) = create_test_store().await;
    db.insert(&make_domain("store-1", "a.com")).await.unwrap();
    db.insert(&make_domain("store-1", "b.com")).await.unwrap();
    db.insert(&make_domain("store-2", "c.com")).await.unwrap();

    db.delete_by_store("store-1").await.unwrap();

    assert!(db.find_by_store("store-1").await.unwrap().is_empty());
    assert_eq!(db.find_by_store("store-2").await.unwrap().len(), 1);
}

// ===== Persistence =====

#[tokio::test]
async fn data_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("nested").join("voltz.db");

    let store = make_store("Loja", 0);
    let domain = make_domain(&store.id, "loja.com");
    {
        let db = SqliteStore::new(&db_path).await.unwrap();
        db.save(&store).await.unwrap();
        db.insert(&domain).await.unwrap();
    }

    let db = SqliteStore::new(&db_path).await.unwrap();
    assert_eq!(StoreRepository::find_all(&db).await.unwrap(), vec![store]);
    assert_eq!(db.find_by_store(&domain.store_id).await.unwrap(), vec![domain]);
}
