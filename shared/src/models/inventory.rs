//! Green-bean inventory models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchased lot of green beans
///
/// `quantity` is a running balance in kilograms, decremented by roasting
/// sessions, direct green sales, and manual stock movements. It must never
/// go below zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GreenBean {
    pub id: Uuid,
    pub supplier_name: String,
    pub variety: String,
    pub origin: String,
    pub quantity: Decimal,
    pub purchase_price_per_kg: Decimal,
    pub entry_date: DateTime<Utc>,
    /// Year-prefixed sequence token, e.g. `GB-2024-001342`
    pub batch_number: String,
    pub low_stock_threshold: Decimal,
}

impl GreenBean {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }

    /// Purchase value of the remaining balance.
    pub fn stock_value(&self) -> Decimal {
        self.quantity * self.purchase_price_per_kg
    }
}

/// Direction of a manual stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    In,
    Out,
}

/// A derived inventory movement for the tracking view
///
/// Movements are not persisted; they are reconstructed from sessions, sales,
/// and lot entry dates at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    pub date: DateTime<Utc>,
    pub bean_id: Uuid,
    pub bean_variety: String,
    /// Positive for incoming stock, negative for consumption.
    pub quantity: Decimal,
    pub reason: String,
}
