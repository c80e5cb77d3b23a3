//! # Sale Repository
//!
//! Database operations for the append-only sale log.
//!
//! ## One Sale, One Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 append_with_decrement(record)                           │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPDATE products SET quantity = quantity - q                          │
//! │      WHERE id = ? AND quantity >= q      ── 0 rows? ROLLBACK            │
//! │    INSERT INTO sales (...)                                              │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Either both effects land or neither does: a committed sale record      │
//! │  always pairs with exactly one stock decrement of equal magnitude.      │
//! │  A caller abandoning the call before COMMIT leaves no trace; after      │
//! │  COMMIT there is nothing left to abandon.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no update or delete here on purpose: sale records are an
//! immutable history.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use till_core::SaleRecord;

const SALE_COLUMNS: &str = "id, product_id, product_name, unit_price_cents, quantity, \
                            total_cents, tendered_cents, change_cents, created_at";

/// Repository for sale log operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Appends a sale record and decrements the product's stock in a single
    /// transaction.
    ///
    /// The decrement carries a `quantity >= q` guard; if it matches no row
    /// the transaction rolls back and nothing is recorded.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - the product vanished (deleted concurrently)
    /// * `DbError::Conflict` - the guard refused the decrement
    pub async fn append_with_decrement(&self, record: &SaleRecord) -> DbResult<()> {
        debug!(
            id = %record.id,
            product_id = %record.product_id,
            quantity = %record.quantity,
            total = %record.total_cents,
            "Committing sale"
        );

        let mut tx = self.pool.begin().await?;

        let decrement = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(&record.product_id)
        .bind(record.quantity)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        if decrement.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ?1")
                .bind(&record.product_id)
                .fetch_one(&mut *tx)
                .await?;
            return if exists == 0 {
                Err(DbError::not_found("Product", &record.product_id))
            } else {
                Err(DbError::conflict("Product", &record.product_id))
            };
        }

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, product_id, product_name, unit_price_cents,
                quantity, total_cents, tendered_cents, change_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&record.id)
        .bind(&record.product_id)
        .bind(&record.product_name)
        .bind(record.unit_price_cents)
        .bind(record.quantity)
        .bind(record.total_cents)
        .bind(record.tendered_cents)
        .bind(record.change_cents)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Lists all sales, newest first (display order for history views).
    pub async fn list(&self) -> DbResult<Vec<SaleRecord>> {
        let sales = sqlx::query_as::<_, SaleRecord>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets a single sale record by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SaleRecord>> {
        let sale = sqlx::query_as::<_, SaleRecord>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Sum of recorded sale totals, in cents.
    ///
    /// Uses the totals frozen at sale time, never a recomputation from
    /// current prices, so the figure is stable against later price edits.
    pub async fn total_sales_cents(&self) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_cents), 0) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    /// Counts sale records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new sale record ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, Utc};
    use till_core::Product;

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

    fn record(id: &str, product_id: &str, quantity: i64, offset_secs: i64) -> SaleRecord {
        let unit_price_cents = 2500;
        let total_cents = unit_price_cents * quantity;
        SaleRecord {
            id: id.to_string(),
            product_id: product_id.to_string(),
            product_name: "Americano".to_string(),
            unit_price_cents,
            quantity,
            total_cents,
            tendered_cents: total_cents,
            change_cents: 0,
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_append_decrements_stock() {
        let db = test_db().await;
        db.products().insert(&product("p-1", 2500, 5)).await.unwrap();

        db.sales()
            .append_with_decrement(&record("s-1", "p-1", 3, 0))
            .await
            .unwrap();

        let p = db.products().get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(p.quantity, 2);
        assert_eq!(db.sales().count().await.unwrap(), 1);
        assert_eq!(db.sales().total_sales_cents().await.unwrap(), 7500);
    }

    #[tokio::test]
    async fn test_append_rolls_back_when_guard_refuses() {
        let db = test_db().await;
        db.products().insert(&product("p-1", 2500, 2)).await.unwrap();

        let err = db
            .sales()
            .append_with_decrement(&record("s-1", "p-1", 5, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));

        // Neither effect landed.
        let p = db.products().get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(p.quantity, 2);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_append_missing_product() {
        let db = test_db().await;

        let err = db
            .sales()
            .append_with_decrement(&record("s-1", "ghost", 1, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = test_db().await;
        db.products()
            .insert(&product("p-1", 2500, 10))
            .await
            .unwrap();

        for (i, offset) in [0i64, 10, 20].iter().enumerate() {
            db.sales()
                .append_with_decrement(&record(&format!("s-{i}"), "p-1", 1, *offset))
                .await
                .unwrap();
        }

        let sales = db.sales().list().await.unwrap();
        let ids: Vec<&str> = sales.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s-2", "s-1", "s-0"]);
    }
}
