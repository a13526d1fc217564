//! Sales models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{PaymentMethod, ProductType};

/// Product id recorded for roasted-coffee sales
///
/// Roasted stock is not tracked as separate inventory, so roasted sales
/// reference this synthetic constant instead of a lot id.
pub const ROASTED_PRODUCT_ID: &str = "roasted-coffee";

/// One sales transaction, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub product_type: ProductType,
    /// A green-bean lot id when `product_type` is green, otherwise
    /// [`ROASTED_PRODUCT_ID`].
    pub product_id: String,
    pub quantity: Decimal,
    pub price_per_kg: Decimal,
    /// Always `quantity * price_per_kg` at creation time.
    pub total_amount: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub sale_date: DateTime<Utc>,
    pub staff_id: Uuid,
}

impl Sale {
    /// The lot this sale consumed, if it was a green-bean sale.
    pub fn green_bean_id(&self) -> Option<Uuid> {
        match self.product_type {
            ProductType::Green => Uuid::parse_str(&self.product_id).ok(),
            ProductType::Roasted => None,
        }
    }
}
