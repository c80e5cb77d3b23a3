//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   SaleRecord    │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  product_id     │   │  name           │       │
//! │  │  category       │   │  name snapshot  │   │  email          │       │
//! │  │  price_cents    │   │  price snapshot │   │  phone          │       │
//! │  │  quantity       │   │  total/change   │   │  address        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Product.quantity is mutated ONLY by the stock ledger.                  │
//! │  SaleRecord is append-only: created once, never updated or deleted.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product tracked in inventory and available for sale.
///
/// `quantity` is the count of sellable units currently on hand. It is never
/// written directly by callers; restocks and sale deductions go through the
/// stock ledger so the non-negativity invariant holds under concurrency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4), immutable.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free-text description.
    pub description: String,

    /// Category label (e.g. "Beverages").
    pub category: String,

    /// Unit price in cents (smallest currency unit), non-negative.
    pub price_cents: i64,

    /// Units on hand, non-negative.
    pub quantity: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Value of the units on hand (price × quantity).
    #[inline]
    pub fn inventory_value(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }

    /// Whether quantity has fallen below the given threshold.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity < threshold
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record.
///
/// Customers have an independent lifecycle: no relationship to products or
/// sales exists in the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sale Record
// =============================================================================

/// An immutable log entry representing one completed transaction.
///
/// Uses the snapshot pattern: product name and unit price are frozen at the
/// time of sale, so later price edits or product deletion never rewrite
/// history. `total_cents` and `change_cents` are computed once at creation
/// and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleRecord {
    pub id: String,

    /// The product sold. May refer to a since-deleted product.
    pub product_id: String,

    /// Product name at time of sale (frozen).
    pub product_name: String,

    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Quantity sold, always positive.
    pub quantity: i64,

    /// unit_price × quantity, fixed at creation.
    pub total_cents: i64,

    /// Cash received from the payer.
    pub tendered_cents: i64,

    /// tendered − total; non-negative for every accepted sale.
    pub change_cents: i64,

    pub created_at: DateTime<Utc>,
}

impl SaleRecord {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the change returned to the payer as Money.
    #[inline]
    pub fn change(&self) -> Money {
        Money::from_cents(self.change_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
