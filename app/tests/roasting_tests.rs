//! Roasting service tests
//!
//! Covers the default yield policy, stock invariants around session
//! creation, and the compensating-write failure path.

mod common;

use tokio_test::assert_ok;
use beanshub_app::config::RoastingConfig;
use beanshub_app::error::AppError;
use beanshub_app::providers::documents::Collection;
use beanshub_app::providers::DocumentStore;
use beanshub_app::services::{
    CreateGreenBeanInput, CreateProfileInput, CreateSessionInput, InventoryService,
    RoastingService,
};
use rust_decimal::Decimal;
use shared::analytics;
use shared::models::{GreenBean, RoastingProfile};
use shared::types::{NotificationKind, Role, StockStatus};
use std::str::FromStr;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn roasting(h: &common::Harness) -> RoastingService {
    RoastingService::new(
        h.store.clone(),
        h.documents_dyn(),
        h.notifier(),
        RoastingConfig::default(),
    )
}

fn inventory(h: &common::Harness) -> InventoryService {
    InventoryService::new(h.store.clone(), h.documents_dyn(), h.notifier())
}

async fn seed_bean(h: &common::Harness, quantity: i64) -> GreenBean {
    inventory(h)
        .create_bean(CreateGreenBeanInput {
            supplier_name: "Koperasi Kopi Gayo".to_string(),
            variety: "Arabica Gayo".to_string(),
            origin: "Aceh, Indonesia".to_string(),
            quantity: Decimal::from(quantity),
            purchase_price_per_kg: Decimal::from(85_000),
            low_stock_threshold: Decimal::from(50),
        })
        .await
        .expect("seed bean")
}

async fn seed_profile(h: &common::Harness) -> RoastingProfile {
    roasting(h)
        .create_profile(CreateProfileInput {
            name: "Medium Roast - Arabica".to_string(),
            temperature_curve: "Gradual rise to 200C, hold 2min, rise to 220C".to_string(),
            target_duration: 12,
            notes: "Perfect for filter coffee".to_string(),
        })
        .await
        .expect("seed profile")
}

fn session_input(bean: &GreenBean, profile: &RoastingProfile, quantity: &str) -> CreateSessionInput {
    CreateSessionInput {
        green_bean_id: bean.id,
        profile_id: profile.id,
        green_bean_quantity: dec(quantity),
        yield_percent: None,
        quality_score: None,
        notes: None,
    }
}

#[tokio::test]
async fn test_session_applies_default_yield_policy() {
    let h = common::harness();
    h.sign_in_locally(Role::Roaster);
    let bean = seed_bean(&h, 100).await;
    let profile = seed_profile(&h).await;

    // 50kg in, no explicit override: the 80% policy applies.
    let session = roasting(&h)
        .create_session(session_input(&bean, &profile, "50"))
        .await
        .expect("create session");

    assert_eq!(session.roasted_quantity, dec("40"));
    assert_eq!(analytics::session_yield(&session), dec("80"));
    assert!(session.batch_number.starts_with("RS-"));
}

#[tokio::test]
async fn test_session_consumption_drives_stock_to_critical() {
    let h = common::harness();
    h.sign_in_locally(Role::Roaster);
    let bean = seed_bean(&h, 500).await;
    let profile = seed_profile(&h).await;

    assert_eq!(
        analytics::stock_status(bean.quantity, bean.low_stock_threshold),
        StockStatus::Normal
    );

    roasting(&h)
        .create_session(session_input(&bean, &profile, "480"))
        .await
        .expect("create session");

    let state = h.store.state();
    let remaining = &state.green_beans[0];
    assert_eq!(remaining.quantity, Decimal::from(20));
    assert_eq!(
        analytics::stock_status(remaining.quantity, remaining.low_stock_threshold),
        StockStatus::Critical
    );
    assert!(state
        .notifications
        .iter()
        .any(|n| n.kind == NotificationKind::Warning && n.title == "Stok Rendah"));
}

#[tokio::test]
async fn test_session_rejected_when_stock_insufficient() {
    let h = common::harness();
    h.sign_in_locally(Role::Roaster);
    let bean = seed_bean(&h, 30).await;
    let profile = seed_profile(&h).await;

    let err = roasting(&h)
        .create_session(session_input(&bean, &profile, "50"))
        .await
        .expect_err("over-consumption");
    assert!(matches!(err, AppError::InsufficientStock(_)));

    // Rejected before any mutation, local or remote.
    let state = h.store.state();
    assert!(state.roasting_sessions.is_empty());
    assert_eq!(state.green_beans[0].quantity, Decimal::from(30));
    let sessions = h
        .documents
        .get_all(Collection::RoastingSessions, None)
        .await
        .expect("get_all");
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_session_with_explicit_yield_override() {
    let h = common::harness();
    h.sign_in_locally(Role::Roaster);
    let bean = seed_bean(&h, 100).await;
    let profile = seed_profile(&h).await;

    let mut input = session_input(&bean, &profile, "50");
    input.yield_percent = Some(85);
    let session = roasting(&h).create_session(input).await.expect("create");

    assert_eq!(session.roasted_quantity, dec("42.5"));
    assert!(session.roasted_quantity <= session.green_bean_quantity);
}

#[tokio::test]
async fn test_session_rejects_invalid_yield_percent() {
    let h = common::harness();
    h.sign_in_locally(Role::Roaster);
    let bean = seed_bean(&h, 100).await;
    let profile = seed_profile(&h).await;

    for invalid in [0u32, 101, 150] {
        let mut input = session_input(&bean, &profile, "50");
        input.yield_percent = Some(invalid);
        let err = roasting(&h)
            .create_session(input)
            .await
            .expect_err("invalid yield");
        assert!(matches!(err, AppError::Validation { .. }));
    }
}

#[tokio::test]
async fn test_session_requires_known_profile() {
    let h = common::harness();
    h.sign_in_locally(Role::Roaster);
    let bean = seed_bean(&h, 100).await;

    let err = roasting(&h)
        .create_session(CreateSessionInput {
            green_bean_id: bean.id,
            profile_id: Uuid::new_v4(),
            green_bean_quantity: dec("50"),
            yield_percent: None,
            quality_score: None,
            notes: None,
        })
        .await
        .expect_err("unknown profile");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_compensation_failure_is_logged_and_surfaced() {
    let h = common::harness();
    h.sign_in_locally(Role::Roaster);
    let bean = seed_bean(&h, 100).await;
    let profile = seed_profile(&h).await;

    // Let the session write through, then fail the inventory decrement.
    h.documents.fail_after_writes(1);
    let err = roasting(&h)
        .create_session(session_input(&bean, &profile, "50"))
        .await
        .expect_err("compensation failure");
    assert!(matches!(err, AppError::CompensationFailed(_)));
    h.documents.reset_failures();

    // The primary write stands; the balances have diverged until the next
    // snapshot, and the user was told.
    let state = h.store.state();
    assert_eq!(state.roasting_sessions.len(), 1);
    assert_eq!(state.green_beans[0].quantity, Decimal::from(100));
    assert!(state
        .notifications
        .iter()
        .any(|n| n.kind == NotificationKind::Error && n.title == "Stok Tidak Sinkron"));
}

#[tokio::test]
async fn test_profile_validation_and_deletion() {
    let h = common::harness();
    h.sign_in_locally(Role::Roaster);
    let service = roasting(&h);

    let err = service
        .create_profile(CreateProfileInput {
            name: "Bad".to_string(),
            temperature_curve: String::new(),
            target_duration: 0,
            notes: String::new(),
        })
        .await
        .expect_err("zero duration");
    assert!(matches!(err, AppError::Validation { .. }));

    let profile = seed_profile(&h).await;
    tokio_test::assert_ok!(service.delete_profile(profile.id).await);
    assert!(h.store.state().roasting_profiles.is_empty());
}
