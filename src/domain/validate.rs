//! Field validation shared by accounts and devices.

use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};

/// Column width of every VARCHAR field in the schema.
pub const MAX_TEXT_LEN: usize = 50;

/// Largest balance representable by NUMERIC(12, 2), exclusive.
pub fn max_balance() -> Decimal {
    Decimal::new(10_000_000_000, 0)
}

/// Trim a required text field and check it fits its column.
pub fn required_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }

    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::BadRequest(format!(
            "{} must be at most {} characters",
            field, MAX_TEXT_LEN
        )));
    }

    Ok(trimmed.to_string())
}

/// Round a balance to cents and check it fits NUMERIC(12, 2).
pub fn balance(value: Decimal) -> AppResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::BadRequest(
            "balance must not be negative".to_string(),
        ));
    }

    let rounded = value.round_dp(2);
    if rounded >= max_balance() {
        return Err(AppError::BadRequest(format!(
            "balance must be less than {}",
            max_balance()
        )));
    }

    Ok(rounded)
}
