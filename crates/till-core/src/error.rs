//! # Error Types
//!
//! Domain-level validation errors for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core (this file)                                                  │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  till-db                                                                │
//! │  └── DbError          - Storage collaborator failures                   │
//! │                                                                         │
//! │  till-engine                                                            │
//! │  └── OpsError         - The full rejection taxonomy callers see         │
//! │                         (wraps both of the above)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, limits)
//! 3. Errors are enum variants, never String
//! 4. Each variant maps to an accurate user-facing message

use thiserror::Error;

/// Input validation errors.
///
/// These occur when request fields don't meet requirements, and are always
/// raised before any state is touched: the caller corrects the input and
/// resubmits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. malformed email or UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A destructive operation was called without `confirmed = true`.
    ///
    /// Delete operations take an explicit confirmation flag instead of
    /// relying on an interactive prompt; an unconfirmed delete is rejected
    /// here with no state change.
    #[error("deleting {entity} requires confirmation")]
    ConfirmationRequired { entity: String },
}
