//! Validation utilities for BeansHub
//!
//! Form-level checks shared by the application core and the WASM surface.

use rust_decimal::Decimal;

// ============================================================================
// Account Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate phone number format
///
/// Accepts local (08xx...) and international (+62...) Indonesian numbers with
/// optional separators.
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() < 9 || digits.len() > 13 {
        return Err("Phone number must have 9-13 digits");
    }
    Ok(())
}

/// Validate a display name is present
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name is required");
    }
    Ok(())
}

// ============================================================================
// Inventory & Roasting Validations
// ============================================================================

/// Validate a kilogram quantity is strictly positive
pub fn validate_positive_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a per-kg price is strictly positive
pub fn validate_positive_price(price: Decimal) -> Result<(), &'static str> {
    if price <= Decimal::ZERO {
        return Err("Price must be positive");
    }
    Ok(())
}

/// Validate a stock threshold is not negative
pub fn validate_threshold(threshold: Decimal) -> Result<(), &'static str> {
    if threshold < Decimal::ZERO {
        return Err("Low stock threshold cannot be negative");
    }
    Ok(())
}

/// Validate a profile's target duration in minutes
pub fn validate_target_duration(minutes: i32) -> Result<(), &'static str> {
    if minutes <= 0 {
        return Err("Target duration must be positive");
    }
    Ok(())
}

/// Validate a quality score is in the 0-10 scoring range
pub fn validate_quality_score(score: Decimal) -> Result<(), &'static str> {
    if score < Decimal::ZERO || score > Decimal::from(10) {
        return Err("Quality score must be between 0 and 10");
    }
    Ok(())
}
