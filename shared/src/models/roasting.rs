//! Roasting profile and session models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named roasting recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoastingProfile {
    pub id: Uuid,
    pub name: String,
    /// Free-text description of the temperature curve.
    pub temperature_curve: String,
    /// Target duration in minutes, always positive.
    pub target_duration: i32,
    pub notes: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One roasting event
///
/// Created atomically with a compensating decrement of the referenced
/// green-bean lot. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoastingSession {
    pub id: Uuid,
    pub green_bean_id: Uuid,
    /// Kilograms of green beans consumed.
    pub green_bean_quantity: Decimal,
    /// Kilograms produced; never exceeds the input quantity.
    pub roasted_quantity: Decimal,
    pub profile_id: Uuid,
    pub roast_date: DateTime<Utc>,
    pub roaster_id: Uuid,
    /// Year-prefixed sequence token, e.g. `RS-2024-001343`
    pub batch_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
