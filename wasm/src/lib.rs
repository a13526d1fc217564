//! WebAssembly module for BeansHub
//!
//! Provides client-side computation for:
//! - Roasting yield and period-over-period change
//! - Stock level and quality classification
//! - Pricing suggestions
//! - Offline form validation

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use shared::analytics::{self, OperatingCosts};
use shared::models::Sale;
use shared::types::DateRange;
use shared::validation;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}

/// Calculate roasting yield percentage
#[wasm_bindgen]
pub fn calculate_roasting_yield(green_quantity: f64, roasted_quantity: f64) -> f64 {
    if green_quantity <= 0.0 {
        return 0.0;
    }
    (roasted_quantity / green_quantity) * 100.0
}

/// Period-over-period change in percent; zero when the previous period is zero
#[wasm_bindgen]
pub fn calculate_period_change(current: f64, previous: f64) -> f64 {
    to_f64(analytics::period_change(to_decimal(current), to_decimal(previous)))
}

/// Classify a stock balance: "critical", "warning", or "normal"
#[wasm_bindgen]
pub fn classify_stock_level(quantity: f64, low_stock_threshold: f64) -> String {
    analytics::stock_status(to_decimal(quantity), to_decimal(low_stock_threshold))
        .as_str()
        .to_string()
}

/// Annualized inventory turnover estimate
#[wasm_bindgen]
pub fn calculate_turnover_rate(total_consumed: f64, current_quantity: f64) -> f64 {
    to_f64(analytics::turnover_rate(
        to_decimal(total_consumed),
        to_decimal(current_quantity),
    ))
}

/// Grade an overall quality score on the 0-10 scale
#[wasm_bindgen]
pub fn classify_quality_score(score: f64) -> String {
    analytics::quality_grade(to_decimal(score)).as_str().to_string()
}

/// Suggested retail price per kg for roasted coffee
#[wasm_bindgen]
pub fn suggest_retail_price(
    purchase_price_per_kg: f64,
    yield_ratio: f64,
    operating_costs_per_kg: f64,
    target_margin_percent: f64,
) -> f64 {
    let costs = OperatingCosts {
        overhead: to_decimal(operating_costs_per_kg),
        ..OperatingCosts::default()
    };
    let pricing = analytics::price_suggestion(
        to_decimal(purchase_price_per_kg),
        to_decimal(yield_ratio),
        &costs,
        to_decimal(target_margin_percent),
    );
    to_f64(pricing.suggested_retail_price)
}

/// Total revenue of the sales (JSON array) falling inside the range (JSON)
#[wasm_bindgen]
pub fn revenue_in_range(sales_json: &str, range_json: &str) -> Result<f64, JsValue> {
    let sales: Vec<Sale> = serde_json::from_str(sales_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid sales JSON: {}", e)))?;
    let range: DateRange = serde_json::from_str(range_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid range JSON: {}", e)))?;

    Ok(to_f64(analytics::total_revenue(analytics::sales_in_range(
        &sales, &range,
    ))))
}

/// Validate email format
#[wasm_bindgen]
pub fn is_valid_email(email: &str) -> bool {
    validation::validate_email(email).is_ok()
}

/// Validate phone number format
#[wasm_bindgen]
pub fn is_valid_phone(phone: &str) -> bool {
    validation::validate_phone(phone).is_ok()
}
