//! # Stock Ledger
//!
//! Serialized stock movements with a non-negativity guarantee.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Per-Product Serialization                          │
//! │                                                                         │
//! │  apply_delta("p-1", -3) ──┐                                             │
//! │  apply_delta("p-1", +5) ──┼──► lock("p-1") ──► one at a time            │
//! │                           │                                             │
//! │  apply_delta("p-2", -1) ─────► lock("p-2") ──► runs concurrently        │
//! │                                                                         │
//! │  Movements on the SAME product queue behind one async mutex, so each    │
//! │  delta applies against the quantity its predecessor left behind.        │
//! │  Movements on DIFFERENT products never wait on each other.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock keeps movements ordered; the non-negativity invariant itself is
//! enforced again by a guarded `UPDATE` at the storage layer, so even a
//! writer that bypasses this ledger cannot drive a quantity below zero.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info};

use crate::error::{OpsError, OpsResult};
use till_core::validation::validate_quantity;
use till_core::Product;
use till_db::{Database, DbError};

// =============================================================================
// Lock Registry
// =============================================================================

/// Registry of per-product async locks.
///
/// Lock entries are created on first use and kept for the life of the
/// process; the set of products is small enough that the map never needs
/// eviction.
#[derive(Debug, Default)]
pub struct ProductLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one product, waiting if a movement on the same
    /// product is in flight.
    pub async fn acquire(&self, product_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().expect("product lock registry poisoned");
            locks
                .entry(product_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// Applies signed stock movements, one per product at a time.
#[derive(Debug, Clone)]
pub struct StockLedger {
    db: Database,
    locks: Arc<ProductLocks>,
}

impl StockLedger {
    pub fn new(db: Database, locks: Arc<ProductLocks>) -> Self {
        StockLedger { db, locks }
    }

    /// Applies a signed quantity delta to one product and returns the
    /// product as updated.
    ///
    /// Positive deltas add stock, negative deltas remove it. A delta that
    /// would take the quantity below zero is rejected whole; partial
    /// application never happens.
    ///
    /// ## Errors
    /// * `OpsError::ProductNotFound` - no product with this ID
    /// * `OpsError::InsufficientStock` - delta would make quantity negative
    pub async fn apply_delta(&self, product_id: &str, delta: i64) -> OpsResult<Product> {
        debug!(product_id = %product_id, delta = %delta, "Applying stock delta");

        let _guard = self.locks.acquire(product_id).await;

        match self.db.products().adjust_quantity(product_id, delta).await {
            Ok(()) => {}
            Err(DbError::NotFound { .. }) => {
                return Err(OpsError::ProductNotFound {
                    id: product_id.to_string(),
                });
            }
            Err(DbError::Conflict { .. }) => {
                // Still holding the lock, so this read is the quantity the
                // guard saw.
                let available = self
                    .db
                    .products()
                    .get_by_id(product_id)
                    .await?
                    .map(|p| p.quantity)
                    .unwrap_or(0);
                return Err(OpsError::InsufficientStock {
                    available,
                    requested: -delta,
                });
            }
            Err(err) => return Err(err.into()),
        }

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| OpsError::ProductNotFound {
                id: product_id.to_string(),
            })?;

        info!(product_id = %product_id, delta = %delta, quantity = %product.quantity, "Stock adjusted");

        Ok(product)
    }

    /// Adds stock for a delivery. The quantity must be positive.
    pub async fn restock(&self, product_id: &str, quantity: i64) -> OpsResult<Product> {
        validate_quantity(quantity)?;
        self.apply_delta(product_id, quantity).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
