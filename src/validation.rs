//! Validation helpers shared by service inputs.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Maximum significant digits for money and quantity values.
pub const MAX_DIGITS: u32 = 8;

/// Maximum fractional digits for money and quantity values.
pub const MAX_DECIMAL_PLACES: u32 = 3;

/// Whether a decimal fits the fixed-point shape used by every numeric column:
/// at most [`MAX_DIGITS`] significant digits, at most [`MAX_DECIMAL_PLACES`]
/// of them fractional. Values are normalized first, so trailing zeros are
/// forgiven ("12345.6780" passes as "12345.678").
pub fn decimal_fits(value: &Decimal) -> bool {
    let normalized = value.normalize();
    if normalized.scale() > MAX_DECIMAL_PLACES {
        return false;
    }
    let digits = normalized.mantissa().unsigned_abs().to_string().len() as u32;
    digits <= MAX_DIGITS
}

/// Validator hook for money-shaped fields (prices, totals, allocations).
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if decimal_fits(value) {
        Ok(())
    } else {
        let mut error = ValidationError::new("decimal_out_of_range");
        error.message = Some("must have at most 8 digits with 3 decimal places".into());
        Err(error)
    }
}

/// Validator hook for quantities: money-shaped and strictly positive.
pub fn validate_quantity(value: &Decimal) -> Result<(), ValidationError> {
    validate_money(value)?;
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("quantity_not_positive");
        error.message = Some("must be greater than zero".into());
        return Err(error);
    }
    Ok(())
}
