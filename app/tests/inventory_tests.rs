//! Inventory service tests

mod common;

use tokio_test::assert_ok;
use beanshub_app::error::AppError;
use beanshub_app::providers::documents::Collection;
use beanshub_app::providers::DocumentStore;
use beanshub_app::services::{CreateGreenBeanInput, InventoryService};
use rust_decimal::Decimal;
use shared::models::MovementDirection;
use shared::types::{NotificationKind, Role};
use uuid::Uuid;

fn service(h: &common::Harness) -> InventoryService {
    InventoryService::new(h.store.clone(), h.documents_dyn(), h.notifier())
}

fn gayo_input(quantity: i64) -> CreateGreenBeanInput {
    CreateGreenBeanInput {
        supplier_name: "Koperasi Kopi Gayo".to_string(),
        variety: "Arabica Gayo".to_string(),
        origin: "Aceh, Indonesia".to_string(),
        quantity: Decimal::from(quantity),
        purchase_price_per_kg: Decimal::from(85_000),
        low_stock_threshold: Decimal::from(50),
    }
}

#[tokio::test]
async fn test_create_bean_persists_and_dispatches() {
    let h = common::harness();
    let staff = h.sign_in_locally(Role::Staff);
    let inventory = service(&h);

    let bean = inventory.create_bean(gayo_input(500)).await.expect("create");

    assert!(bean.batch_number.starts_with("GB-"));
    assert_eq!(h.store.state().green_beans, vec![bean.clone()]);

    // The document landed in the store, scoped to the owner.
    let documents = h
        .documents
        .get_all(Collection::GreenBeans, Some(staff.id))
        .await
        .expect("get_all");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, bean.id);
}

#[tokio::test]
async fn test_create_bean_requires_authentication() {
    let h = common::harness();
    let inventory = service(&h);

    let err = inventory
        .create_bean(gayo_input(500))
        .await
        .expect_err("unauthenticated");
    assert!(matches!(err, AppError::NotAuthenticated));
    assert!(h.store.state().green_beans.is_empty());
}

#[tokio::test]
async fn test_create_bean_rejects_nonpositive_quantity() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);
    let inventory = service(&h);

    let err = inventory
        .create_bean(gayo_input(0))
        .await
        .expect_err("zero quantity");
    assert!(matches!(err, AppError::Validation { .. }));

    // Nothing was written or dispatched.
    assert!(h.store.state().green_beans.is_empty());
    let documents = h
        .documents
        .get_all(Collection::GreenBeans, None)
        .await
        .expect("get_all");
    assert!(documents.is_empty());
}

#[tokio::test]
async fn test_movement_out_rejected_below_zero() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);
    let inventory = service(&h);
    let bean = inventory.create_bean(gayo_input(100)).await.expect("create");

    let err = inventory
        .record_movement(bean.id, MovementDirection::Out, Decimal::from(150))
        .await
        .expect_err("over-withdrawal");
    assert!(matches!(err, AppError::InsufficientStock(_)));

    // Rejected before any mutation.
    assert_eq!(h.store.state().green_beans[0].quantity, Decimal::from(100));
}

#[tokio::test]
async fn test_movements_adjust_balance_and_warn_on_low_stock() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);
    let inventory = service(&h);
    let bean = inventory.create_bean(gayo_input(100)).await.expect("create");

    let updated = inventory
        .record_movement(bean.id, MovementDirection::In, Decimal::from(50))
        .await
        .expect("stock in");
    assert_eq!(updated.quantity, Decimal::from(150));

    let updated = inventory
        .record_movement(bean.id, MovementDirection::Out, Decimal::from(120))
        .await
        .expect("stock out");
    assert_eq!(updated.quantity, Decimal::from(30));
    assert!(updated.is_low_stock());

    // Crossing the threshold raised a warning notification.
    let state = h.store.state();
    assert!(state
        .notifications
        .iter()
        .any(|n| n.kind == NotificationKind::Warning && n.title == "Stok Rendah"));
}

#[tokio::test]
async fn test_movement_unknown_bean() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);
    let inventory = service(&h);

    let err = inventory
        .record_movement(Uuid::new_v4(), MovementDirection::In, Decimal::from(10))
        .await
        .expect_err("unknown bean");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_bean_removes_locally_and_remotely() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);
    let inventory = service(&h);
    let bean = inventory.create_bean(gayo_input(500)).await.expect("create");

    tokio_test::assert_ok!(inventory.delete_bean(bean.id).await);

    assert!(h.store.state().green_beans.is_empty());
    let remaining = h
        .documents
        .get_all(Collection::GreenBeans, None)
        .await
        .expect("get_all");
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn test_write_failure_is_visible_not_silent() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);
    let inventory = service(&h);

    h.documents.fail_after_writes(0);
    let err = inventory
        .create_bean(gayo_input(500))
        .await
        .expect_err("injected failure");
    assert!(matches!(err, AppError::WriteFailed(_)));

    // No local action was dispatched, and a failure notification surfaced.
    let state = h.store.state();
    assert!(state.green_beans.is_empty());
    assert!(state
        .notifications
        .iter()
        .any(|n| n.kind == NotificationKind::Error && n.title == "Operasi Gagal"));
}
