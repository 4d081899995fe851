//! # Validation Module
//!
//! Input validation for purchase requests.
//!
//! Validation runs before business logic: a cart item is checked in full
//! before anything is summed or persisted. The database layer adds its own
//! NOT NULL and foreign-key constraints underneath.

use crate::error::ValidationError;
use crate::types::CartItem;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of an employee code.
pub const MAX_EMP_CD_LEN: usize = 10;

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in minor currency units.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free items)
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates one cart item in full.
pub fn validate_cart_item(item: &CartItem) -> ValidationResult<()> {
    validate_quantity(item.quantity)?;
    validate_price(item.price)?;
    Ok(())
}

/// Validates an employee code supplied on a purchase request.
///
/// ## Rules
/// - Must not be empty when present
/// - Must fit the schema column (10 characters)
pub fn validate_emp_cd(emp_cd: &str) -> ValidationResult<()> {
    let emp_cd = emp_cd.trim();

    if emp_cd.is_empty() {
        return Err(ValidationError::Required {
            field: "emp_cd".to_string(),
        });
    }

    if emp_cd.len() > MAX_EMP_CD_LEN {
        return Err(ValidationError::TooLong {
            field: "emp_cd".to_string(),
            max: MAX_EMP_CD_LEN,
        });
    }

    Ok(())
}
