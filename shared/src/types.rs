//! Common types used across the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to a user account
///
/// Roles gate which screens and actions the UI offers. Authorization is
/// advisory at this layer; the document store enforces its own rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Role {
    Admin,
    Roaster,
    #[default]
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Roaster => "Roaster",
            Role::Staff => "Staff",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Admin" => Some(Role::Admin),
            "Roaster" => Some(Role::Roaster),
            "Staff" => Some(Role::Staff),
            _ => None,
        }
    }
}

/// Kind of product being sold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Green,
    Roasted,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Green => "green",
            ProductType::Roasted => "roasted",
        }
    }
}

/// Payment methods accepted at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Transfer => "Transfer",
        }
    }
}

/// Severity of an in-app notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
    Success,
}

/// Stock level classification for an inventory lot
///
/// Ordering is by severity: `Critical > Warning > Normal`. Boundary values
/// belong to the severer bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Normal,
    Warning,
    Critical,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Normal => "normal",
            StockStatus::Warning => "warning",
            StockStatus::Critical => "critical",
        }
    }
}

/// Quality grade derived from an overall score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QualityGrade {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl QualityGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityGrade::Excellent => "Excellent",
            QualityGrade::VeryGood => "Very Good",
            QualityGrade::Good => "Good",
            QualityGrade::Fair => "Fair",
            QualityGrade::Poor => "Poor",
        }
    }
}

/// Inclusive date range for report queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Both endpoints are part of the range.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}
