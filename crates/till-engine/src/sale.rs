//! # Sale Processor
//!
//! Records sales against the catalog: validate, check payment, move stock,
//! append the immutable sale record.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      record_sale(request)                               │
//! │                                                                         │
//! │  1. Validate input        ──► InvalidInput        (nothing touched)     │
//! │  2. Lock product, fetch   ──► ProductNotFound     (nothing touched)     │
//! │  3. total vs tendered     ──► InsufficientPayment (nothing touched)     │
//! │  4. Decrement + append    ──► InsufficientStock   (nothing touched)     │
//! │          │                                                              │
//! │          ▼ one transaction                                              │
//! │  SaleRecord { total, tendered, change } with price frozen at sale time  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payment is checked BEFORE stock: an underpaid request never moves
//! inventory. Every rejection leaves both stores exactly as they were.
//!
//! The record snapshots the product name and unit price, so later catalog
//! edits cannot rewrite sales history.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{OpsError, OpsResult};
use crate::stock::ProductLocks;
use std::sync::Arc;
use till_core::validation::{validate_quantity, validate_required_text, validate_tendered_cents};
use till_core::SaleRecord;
use till_db::repository::sale::generate_sale_id;
use till_db::{Database, DbError};

/// A request to record one sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub product_id: String,
    pub quantity: i64,
    pub tendered_cents: i64,
}

/// Records sales, serialized per product via the shared lock registry.
#[derive(Debug, Clone)]
pub struct SaleProcessor {
    db: Database,
    locks: Arc<ProductLocks>,
}

impl SaleProcessor {
    pub fn new(db: Database, locks: Arc<ProductLocks>) -> Self {
        SaleProcessor { db, locks }
    }

    /// Records a sale: decrements stock and appends the sale record in one
    /// transaction, returning the completed record.
    ///
    /// ## Errors
    /// The first applicable failure wins, in this order:
    /// * `OpsError::InvalidInput` - bad quantity or negative tender
    /// * `OpsError::ProductNotFound` - unknown product
    /// * `OpsError::InsufficientPayment` - tendered below total
    /// * `OpsError::InsufficientStock` - not enough units on hand
    pub async fn record_sale(&self, request: SaleRequest) -> OpsResult<SaleRecord> {
        debug!(
            product_id = %request.product_id,
            quantity = %request.quantity,
            tendered = %request.tendered_cents,
            "record_sale"
        );

        let product_id = validate_required_text("product id", &request.product_id)?;
        validate_quantity(request.quantity)?;
        validate_tendered_cents(request.tendered_cents)?;

        // Hold the product lock for the whole operation so records append
        // in the same order their decrements commit.
        let _guard = self.locks.acquire(&product_id).await;

        let product = self
            .db
            .products()
            .get_by_id(&product_id)
            .await?
            .ok_or_else(|| OpsError::ProductNotFound {
                id: product_id.clone(),
            })?;

        let total_cents = product.price_cents * request.quantity;
        if request.tendered_cents < total_cents {
            return Err(OpsError::InsufficientPayment {
                total_cents,
                tendered_cents: request.tendered_cents,
            });
        }

        if product.quantity < request.quantity {
            return Err(OpsError::InsufficientStock {
                available: product.quantity,
                requested: request.quantity,
            });
        }

        let record = SaleRecord {
            id: generate_sale_id(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity: request.quantity,
            total_cents,
            tendered_cents: request.tendered_cents,
            change_cents: request.tendered_cents - total_cents,
            created_at: Utc::now(),
        };

        match self.db.sales().append_with_decrement(&record).await {
            Ok(()) => {}
            // The lock makes these unreachable for ledger-mediated writers,
            // but an out-of-band writer could still race us to the guard.
            Err(DbError::NotFound { .. }) => {
                return Err(OpsError::ProductNotFound { id: product_id });
            }
            Err(DbError::Conflict { .. }) => {
                let available = self
                    .db
                    .products()
                    .get_by_id(&product_id)
                    .await?
                    .map(|p| p.quantity)
                    .unwrap_or(0);
                return Err(OpsError::InsufficientStock {
                    available,
                    requested: request.quantity,
                });
            }
            Err(err) => return Err(err.into()),
        }

        info!(
            sale_id = %record.id,
            product_id = %record.product_id,
            quantity = %record.quantity,
            total = %record.total_cents,
            change = %record.change_cents,
            "Sale recorded"
        );

        Ok(record)
    }

    /// Lists recorded sales, newest first.
    pub async fn sales_history(&self) -> OpsResult<Vec<SaleRecord>> {
        Ok(self.db.sales().list().await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use till_core::Product;
    use till_db::DbConfig;

    fn product(id: &str, price_cents: i64, quantity: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: "Americano".to_string(),
            description: String::new(),
            category: "Beverages".to_string(),
            price_cents,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(product_id: &str, quantity: i64, tendered_cents: i64) -> SaleRequest {
        SaleRequest {
            product_id: product_id.to_string(),
            quantity,
            tendered_cents,
        }
    }

    async fn processor() -> (Database, SaleProcessor) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let processor = SaleProcessor::new(db.clone(), Arc::new(ProductLocks::new()));
        (db, processor)
    }

    #[tokio::test]
    async fn test_record_sale_happy_path() {
        let (db, processor) = processor().await;
        db.products().insert(&product("p-1", 2500, 5)).await.unwrap();

        let record = processor.record_sale(request("p-1", 3, 7500)).await.unwrap();
        assert_eq!(record.total_cents, 7500);
        assert_eq!(record.change_cents, 0);
        assert_eq!(record.product_name, "Americano");
        assert_eq!(record.unit_price_cents, 2500);

        let p = db.products().get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(p.quantity, 2);
    }

    #[tokio::test]
    async fn test_record_sale_returns_change() {
        let (db, processor) = processor().await;
        db.products().insert(&product("p-1", 2500, 5)).await.unwrap();

        let record = processor
            .record_sale(request("p-1", 2, 10000))
            .await
            .unwrap();
        assert_eq!(record.total_cents, 5000);
        assert_eq!(record.change_cents, 5000);
    }

    #[tokio::test]
    async fn test_underpayment_rejected_before_stock_moves() {
        let (db, processor) = processor().await;
        db.products().insert(&product("p-1", 2500, 5)).await.unwrap();

        let err = processor
            .record_sale(request("p-1", 3, 5000))
            .await
            .unwrap_err();
        match err {
            OpsError::InsufficientPayment {
                total_cents,
                tendered_cents,
            } => {
                assert_eq!(total_cents, 7500);
                assert_eq!(tendered_cents, 5000);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // No stock moved, no record appended.
        let p = db.products().get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(p.quantity, 5);
        assert!(processor.sales_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payment_checked_before_stock() {
        // Both payment and stock are short; payment must win.
        let (db, processor) = processor().await;
        db.products().insert(&product("p-1", 2500, 2)).await.unwrap();

        let err = processor
            .record_sale(request("p-1", 5, 1000))
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::InsufficientPayment { .. }));
    }

    #[tokio::test]
    async fn test_insufficient_stock() {
        let (db, processor) = processor().await;
        db.products().insert(&product("p-1", 2500, 2)).await.unwrap();

        let err = processor
            .record_sale(request("p-1", 5, 20000))
            .await
            .unwrap_err();
        match err {
            OpsError::InsufficientStock {
                available,
                requested,
            } => {
                assert_eq!(available, 2);
                assert_eq!(requested, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let p = db.products().get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(p.quantity, 2);
    }

    #[tokio::test]
    async fn test_sale_of_exact_stock_reaches_zero() {
        let (db, processor) = processor().await;
        db.products().insert(&product("p-1", 2500, 3)).await.unwrap();

        let record = processor.record_sale(request("p-1", 3, 7500)).await.unwrap();
        assert_eq!(record.change_cents, 0);

        let p = db.products().get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(p.quantity, 0);
    }

    #[tokio::test]
    async fn test_invalid_quantity_rejected_first() {
        let (_db, processor) = processor().await;

        // Product doesn't even exist, but input validation wins.
        let err = processor
            .record_sale(request("ghost", 0, 1000))
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::InvalidInput(_)));

        let err = processor
            .record_sale(request("ghost", 1, -5))
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let (_db, processor) = processor().await;

        let err = processor
            .record_sale(request("ghost", 1, 1000))
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::ProductNotFound { .. }));
    }

    #[tokio::test]
    async fn test_free_item_with_zero_tender() {
        let (db, processor) = processor().await;
        db.products().insert(&product("p-1", 0, 5)).await.unwrap();

        let record = processor.record_sale(request("p-1", 1, 0)).await.unwrap();
        assert_eq!(record.total_cents, 0);
        assert_eq!(record.change_cents, 0);
    }

    #[tokio::test]
    async fn test_concurrent_sales_of_last_unit() {
        let (db, processor) = processor().await;
        db.products().insert(&product("p-1", 2500, 1)).await.unwrap();

        let a = {
            let p = processor.clone();
            tokio::spawn(async move { p.record_sale(request("p-1", 1, 2500)).await })
        };
        let b = {
            let p = processor.clone();
            tokio::spawn(async move { p.record_sale(request("p-1", 1, 2500)).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let ok = results.iter().filter(|r| r.is_ok()).count();
        let stock_errs = results
            .iter()
            .filter(|r| matches!(r, Err(OpsError::InsufficientStock { .. })))
            .count();

        assert_eq!(ok, 1);
        assert_eq!(stock_errs, 1);

        let p = db.products().get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(p.quantity, 0);
        assert_eq!(processor.sales_history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_survives_product_price_change() {
        let (db, processor) = processor().await;
        db.products().insert(&product("p-1", 2500, 5)).await.unwrap();

        let record = processor.record_sale(request("p-1", 1, 2500)).await.unwrap();

        let mut edited = db.products().get_by_id("p-1").await.unwrap().unwrap();
        edited.price_cents = 9900;
        db.products().update(&edited).await.unwrap();

        let history = processor.sales_history().await.unwrap();
        assert_eq!(history[0].unit_price_cents, 2500);
        assert_eq!(history[0].total_cents, record.total_cents);
    }
}
