//! # Error Types
//!
//! Domain-specific error types for vend-core.
//!
//! ## Error Flow
//! ```text
//! ValidationError ──► CoreError ──► CheckoutError (api) ──► ApiError ──► HTTP
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` derive macros, never manual impls
//! 2. Context in messages (item name, field)
//! 3. Errors are enum variants, never bare strings

use thiserror::Error;

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A cart item failed validation.
    ///
    /// Raised by the purchase calculator before any amount is summed, so a
    /// bad cart never produces partial totals.
    #[error("invalid cart item '{name}': {source}")]
    InvalidCartItem {
        name: String,
        #[source]
        source: ValidationError,
    },
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

/// Convenience alias for results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidCartItem {
            name: "Green Tea 500ml".to_string(),
            source: ValidationError::MustBePositive {
                field: "quantity".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "invalid cart item 'Green Tea 500ml': quantity must be positive"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        };
        assert!(err.to_string().starts_with("price must be between"));
    }
}
