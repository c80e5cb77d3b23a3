//! # Product Repository
//!
//! Database operations for products.
//!
//! ## The Quantity Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                                │
//! │                                                                         │
//! │  ❌ WRONG: Absolute update (read-modify-write race)                     │
//! │     read quantity=5 → compute 5-3 → UPDATE quantity = 2                 │
//! │     Two terminals doing this concurrently lose one of the sales.       │
//! │                                                                         │
//! │  ✅ CORRECT: Guarded delta update                                       │
//! │     UPDATE products SET quantity = quantity + (-3)                      │
//! │     WHERE id = ? AND quantity + (-3) >= 0                               │
//! │                                                                         │
//! │  `update()` therefore cannot touch the quantity column at all;          │
//! │  `adjust_quantity()` is the only write path for stock levels.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use till_core::Product;

const PRODUCT_COLUMNS: &str =
    "id, name, description, category, price_cents, quantity, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list().await?;
/// let one = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, sorted by name for stable display.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, category,
                price_cents, quantity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a product's descriptive fields and price.
    ///
    /// Deliberately does NOT write the quantity column: stock levels change
    /// only through [`ProductRepository::adjust_quantity`], so a stale
    /// product struct can never clobber concurrent sales.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                category = ?4,
                price_cents = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Applies a signed stock delta with a non-negativity guard.
    ///
    /// The guard runs inside the UPDATE itself, so even a writer that
    /// bypasses the engine's per-product lock cannot take quantity below
    /// zero.
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Change in stock (negative for sales, positive for restocking)
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no product with this id
    /// * `DbError::Conflict` - the delta would take quantity below zero
    pub async fn adjust_quantity(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1 AND quantity + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish "no such product" from "guard refused the delta".
            return match self.get_by_id(id).await? {
                Some(_) => Err(DbError::conflict("Product", id)),
                None => Err(DbError::not_found("Product", id)),
            };
        }

        Ok(())
    }

    /// Deletes a product by id.
    ///
    /// Historical sales keep their denormalized snapshot of this product;
    /// nothing cascades.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Products with quantity strictly below the threshold, ascending by
    /// quantity so the most urgent items come first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE quantity < ?1 ORDER BY quantity ASC, name ASC"
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Sum of price × quantity across all products, in cents.
    pub async fn inventory_value_cents(&self) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(price_cents * quantity), 0) FROM products",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample(id: &str, name: &str, price_cents: i64, quantity: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: "test".to_string(),
            category: "Beverages".to_string(),
            price_cents,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let p = sample("p-1", "Americano", 2500, 5);
        repo.insert(&p).await.unwrap();

        let loaded = repo.get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Americano");
        assert_eq!(loaded.price_cents, 2500);
        assert_eq!(loaded.quantity, 5);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_does_not_touch_quantity() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample("p-1", "Americano", 2500, 5))
            .await
            .unwrap();

        // A stale struct with the wrong quantity must not clobber stock.
        let stale = sample("p-1", "Americano Grande", 3000, 999);
        repo.update(&stale).await.unwrap();

        let loaded = repo.get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Americano Grande");
        assert_eq!(loaded.price_cents, 3000);
        assert_eq!(loaded.quantity, 5);
    }

    #[tokio::test]
    async fn test_adjust_quantity_guard() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample("p-1", "Americano", 2500, 2))
            .await
            .unwrap();

        repo.adjust_quantity("p-1", -2).await.unwrap();
        let loaded = repo.get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(loaded.quantity, 0);

        // One more unit would go negative: guard refuses, state unchanged.
        let err = repo.adjust_quantity("p-1", -1).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
        let loaded = repo.get_by_id("p-1").await.unwrap().unwrap();
        assert_eq!(loaded.quantity, 0);

        let err = repo.adjust_quantity("missing", -1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample("p-1", "Americano", 2500, 5))
            .await
            .unwrap();
        repo.delete("p-1").await.unwrap();

        assert!(repo.get_by_id("p-1").await.unwrap().is_none());
        assert!(matches!(
            repo.delete("p-1").await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_low_stock_ordering() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample("p-1", "Beans", 1000, 20)).await.unwrap();
        repo.insert(&sample("p-2", "Milk", 500, 3)).await.unwrap();
        repo.insert(&sample("p-3", "Cups", 200, 7)).await.unwrap();

        let low = repo.low_stock(10).await.unwrap();
        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Cups"]);
    }

    #[tokio::test]
    async fn test_inventory_value() {
        let db = test_db().await;
        let repo = db.products();

        assert_eq!(repo.inventory_value_cents().await.unwrap(), 0);

        repo.insert(&sample("p-1", "Beans", 1000, 2)).await.unwrap();
        repo.insert(&sample("p-2", "Milk", 500, 3)).await.unwrap();

        // 1000×2 + 500×3
        assert_eq!(repo.inventory_value_cents().await.unwrap(), 3500);
    }
}
