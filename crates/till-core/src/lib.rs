//! # till-core: Pure Business Logic for Till
//!
//! This crate is the **heart** of Till, a small retail operations system:
//! products with stock, sales against that stock, a customer list, and the
//! derived reports. It contains all business rules as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Till Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              UI / API collaborator (out of scope)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-engine                                  │   │
//! │  │    StockLedger · SaleProcessor · ReportAggregator · CRUD        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │  Product  │  │   Money   │  │   rules   │                  │   │
//! │  │   │ SaleRecord│  │ integer ¢ │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-db (Storage Layer)                      │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::money::Money;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(2500); // 25.00
//!
//! // Sale total and change are plain integer arithmetic
//! let total = price.multiply_quantity(3);
//! let tendered: Money = "80.00".parse().unwrap();
//! assert_eq!((tendered - total).cents(), 500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use error::ValidationError;
pub use money::Money;
pub use types::{Customer, Product, SaleRecord};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default low-stock threshold: products with quantity strictly below this
/// are flagged for attention.
///
/// ## Why a constant?
/// This is only the *default*; the report configuration can override it
/// per deployment.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Maximum quantity accepted in a single sale or restock.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_SALE_QUANTITY: i64 = 999;

/// Maximum unit price in cents (1,000,000.00).
///
/// Together with [`MAX_SALE_QUANTITY`] this keeps every
/// `price × quantity` total below 10^11 cents, nowhere near i64 range,
/// so sale-total arithmetic cannot overflow.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Maximum length of free-text fields (names, categories, addresses).
pub const MAX_TEXT_FIELD_LEN: usize = 200;
