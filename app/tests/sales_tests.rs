//! Sales service tests
//!
//! Covers total-amount consistency, green-stock invariants, compensating
//! decrements, and visible failure modes.

mod common;

use beanshub_app::config::RoastingConfig;
use beanshub_app::error::AppError;
use beanshub_app::services::{
    CreateGreenBeanInput, CreateProfileInput, CreateSessionInput, InventoryService,
    RoastingService, SalesService, RecordSaleInput,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use shared::analytics;
use shared::models::{GreenBean, ROASTED_PRODUCT_ID};
use shared::types::{DateRange, NotificationKind, PaymentMethod, ProductType, Role};
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn sales(h: &common::Harness) -> SalesService {
    SalesService::new(h.store.clone(), h.documents_dyn(), h.notifier())
}

async fn seed_bean(h: &common::Harness, quantity: i64) -> GreenBean {
    InventoryService::new(h.store.clone(), h.documents_dyn(), h.notifier())
        .create_bean(CreateGreenBeanInput {
            supplier_name: "Petani Toraja".to_string(),
            variety: "Toraja Kalosi".to_string(),
            origin: "Sulawesi, Indonesia".to_string(),
            quantity: Decimal::from(quantity),
            purchase_price_per_kg: Decimal::from(95_000),
            low_stock_threshold: Decimal::from(30),
        })
        .await
        .expect("seed bean")
}

fn roasted_sale(quantity: &str, price: &str) -> RecordSaleInput {
    RecordSaleInput {
        product_type: ProductType::Roasted,
        green_bean_id: None,
        quantity: dec(quantity),
        price_per_kg: dec(price),
        payment_method: PaymentMethod::Cash,
        customer_name: Some("Cafe Arabica".to_string()),
        customer_phone: Some("081234567890".to_string()),
    }
}

#[tokio::test]
async fn test_roasted_sale_total_and_date_filter() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);

    let sale = sales(&h)
        .record_sale(roasted_sale("5", "150000"))
        .await
        .expect("record sale");

    assert_eq!(sale.total_amount, dec("750000"));
    assert_eq!(sale.product_id, ROASTED_PRODUCT_ID);

    let state = h.store.state();
    assert_eq!(state.sales.len(), 1);

    // A range excluding the sale date returns nothing; one including it
    // returns exactly this sale.
    let now = Utc::now();
    let excluding = DateRange::new(now - Duration::days(30), now - Duration::days(20));
    assert!(analytics::sales_in_range(&state.sales, &excluding).is_empty());

    let including = DateRange::new(now - Duration::days(1), now + Duration::days(1));
    let matched = analytics::sales_in_range(&state.sales, &including);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, sale.id);
}

#[tokio::test]
async fn test_green_sale_decrements_lot() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);
    let bean = seed_bean(&h, 200).await;

    let sale = sales(&h)
        .record_sale(RecordSaleInput {
            product_type: ProductType::Green,
            green_bean_id: Some(bean.id),
            quantity: dec("180"),
            price_per_kg: dec("100000"),
            payment_method: PaymentMethod::Transfer,
            customer_name: None,
            customer_phone: None,
        })
        .await
        .expect("record sale");

    assert_eq!(sale.product_id, bean.id.to_string());
    let state = h.store.state();
    assert_eq!(state.green_beans[0].quantity, Decimal::from(20));
    // 20 <= 30 threshold: the compensating decrement warned about stock.
    assert!(state
        .notifications
        .iter()
        .any(|n| n.kind == NotificationKind::Warning && n.title == "Stok Rendah"));
}

#[tokio::test]
async fn test_green_sale_rejected_below_zero() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);
    let bean = seed_bean(&h, 50).await;

    let err = sales(&h)
        .record_sale(RecordSaleInput {
            product_type: ProductType::Green,
            green_bean_id: Some(bean.id),
            quantity: dec("80"),
            price_per_kg: dec("100000"),
            payment_method: PaymentMethod::Cash,
            customer_name: None,
            customer_phone: None,
        })
        .await
        .expect_err("over-sale");
    assert!(matches!(err, AppError::InsufficientStock(_)));

    let state = h.store.state();
    assert!(state.sales.is_empty());
    assert_eq!(state.green_beans[0].quantity, Decimal::from(50));
}

#[tokio::test]
async fn test_green_sale_requires_lot_selection() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);

    let err = sales(&h)
        .record_sale(RecordSaleInput {
            product_type: ProductType::Green,
            green_bean_id: None,
            quantity: dec("5"),
            price_per_kg: dec("100000"),
            payment_method: PaymentMethod::Cash,
            customer_name: None,
            customer_phone: None,
        })
        .await
        .expect_err("missing lot");
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn test_no_operation_sequence_drives_stock_negative() {
    let h = common::harness();
    h.sign_in_locally(Role::Roaster);
    let bean = seed_bean(&h, 100).await;
    let profile = RoastingService::new(
        h.store.clone(),
        h.documents_dyn(),
        h.notifier(),
        RoastingConfig::default(),
    )
    .create_profile(CreateProfileInput {
        name: "Dark Roast - Robusta".to_string(),
        temperature_curve: "Quick rise to 210C, hold 1min, rise to 230C".to_string(),
        target_duration: 15,
        notes: "Great for espresso".to_string(),
    })
    .await
    .expect("profile");

    let roasting = RoastingService::new(
        h.store.clone(),
        h.documents_dyn(),
        h.notifier(),
        RoastingConfig::default(),
    );
    let sales_service = sales(&h);

    // Interleave consumption until the lot is nearly exhausted; every
    // attempt that would overdraw is rejected before mutation.
    for round in 0..6 {
        let before = h.store.state().green_beans[0].quantity;
        let result = if round % 2 == 0 {
            roasting
                .create_session(CreateSessionInput {
                    green_bean_id: bean.id,
                    profile_id: profile.id,
                    green_bean_quantity: dec("30"),
                    yield_percent: None,
                    quality_score: None,
                    notes: None,
                })
                .await
                .map(|_| ())
        } else {
            sales_service
                .record_sale(RecordSaleInput {
                    product_type: ProductType::Green,
                    green_bean_id: Some(bean.id),
                    quantity: dec("30"),
                    price_per_kg: dec("100000"),
                    payment_method: PaymentMethod::Cash,
                    customer_name: None,
                    customer_phone: None,
                })
                .await
                .map(|_| ())
        };

        let after = h.store.state().green_beans[0].quantity;
        assert!(after >= Decimal::ZERO);
        if result.is_err() {
            assert_eq!(after, before);
        }
    }

    // 100kg allows exactly three 30kg draws.
    assert_eq!(h.store.state().green_beans[0].quantity, Decimal::from(10));
}

#[tokio::test]
async fn test_sale_write_failure_is_visible() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);

    h.documents.fail_after_writes(0);
    let err = sales(&h)
        .record_sale(roasted_sale("5", "150000"))
        .await
        .expect_err("injected failure");
    assert!(matches!(err, AppError::WriteFailed(_)));

    let state = h.store.state();
    assert!(state.sales.is_empty());
    assert!(state
        .notifications
        .iter()
        .any(|n| n.kind == NotificationKind::Error && n.title == "Operasi Gagal"));
}

#[tokio::test]
async fn test_sale_compensation_failure_diverges_visibly() {
    let h = common::harness();
    h.sign_in_locally(Role::Staff);
    let bean = seed_bean(&h, 100).await;

    // The sale write succeeds, the inventory decrement does not.
    h.documents.fail_after_writes(1);
    let err = sales(&h)
        .record_sale(RecordSaleInput {
            product_type: ProductType::Green,
            green_bean_id: Some(bean.id),
            quantity: dec("40"),
            price_per_kg: dec("100000"),
            payment_method: PaymentMethod::Card,
            customer_name: None,
            customer_phone: None,
        })
        .await
        .expect_err("compensation failure");
    assert!(matches!(err, AppError::CompensationFailed(_)));
    h.documents.reset_failures();

    let state = h.store.state();
    assert_eq!(state.sales.len(), 1);
    assert_eq!(state.green_beans[0].quantity, Decimal::from(100));
    assert!(state
        .notifications
        .iter()
        .any(|n| n.kind == NotificationKind::Error && n.title == "Stok Tidak Sinkron"));
}
