//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! CRUD handlers and the checkout flow. SurrealDB TEXT fields have no
//! built-in length enforcement, so limits are applied here.

use rust_decimal::Decimal;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, vendor display names
pub const MAX_NAME_LEN: usize = 200;

/// Free-text descriptions
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Street address, city
pub const MAX_ADDRESS_LEN: usize = 500;

/// Postal codes and other short identifiers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_argument(format!(
            "{field} must not be empty"
        )));
    }
    if value.len() > max_len {
        return Err(AppError::invalid_argument(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::invalid_argument(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a monetary amount is not negative.
pub fn validate_non_negative_amount(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.is_sign_negative() {
        return Err(AppError::invalid_argument(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

/// Validate that a stock level is not negative.
pub fn validate_non_negative_stock(value: i64, field: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::invalid_argument(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}
