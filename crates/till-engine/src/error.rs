//! # Engine Error Types
//!
//! The single error surface for all engine operations.
//!
//! ## Design: Check Order Is Part of the Contract
//! Sale processing reports the FIRST applicable failure in a fixed order:
//!
//! 1. `InvalidInput` - malformed request (bad quantity, negative tender)
//! 2. `ProductNotFound` - the product does not exist
//! 3. `InsufficientPayment` - tendered below total, checked BEFORE any
//!    stock movement so an underpaid sale never touches inventory
//! 4. `InsufficientStock` - not enough units on hand
//!
//! Callers can rely on this ordering: seeing `InsufficientStock` means the
//! input was valid, the product existed and the payment covered the total.

use thiserror::Error;

use till_core::ValidationError;
use till_db::DbError;

/// Errors produced by engine operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Request failed validation before touching any store.
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    /// No product with the given ID.
    #[error("product not found: {id}")]
    ProductNotFound { id: String },

    /// No customer with the given ID.
    #[error("customer not found: {id}")]
    CustomerNotFound { id: String },

    /// Tendered amount does not cover the sale total. No stock was moved.
    #[error("insufficient payment: total is {total_cents} cents, tendered {tendered_cents} cents")]
    InsufficientPayment {
        total_cents: i64,
        tendered_cents: i64,
    },

    /// Not enough units on hand for the requested movement.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    /// The storage layer failed.
    #[error("storage unavailable: {0}")]
    StoreUnavailable(#[from] DbError),
}

/// Result alias for engine operations.
pub type OpsResult<T> = Result<T, OpsError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = OpsError::InsufficientPayment {
            total_cents: 7500,
            tendered_cents: 5000,
        };
        assert_eq!(
            err.to_string(),
            "insufficient payment: total is 7500 cents, tendered 5000 cents"
        );

        let err = OpsError::InsufficientStock {
            available: 2,
            requested: 5,
        };
        assert_eq!(err.to_string(), "insufficient stock: 2 available, 5 requested");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: OpsError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();
        assert!(matches!(err, OpsError::InvalidInput(_)));
    }
}
