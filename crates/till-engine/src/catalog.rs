//! # Product Catalog
//!
//! Catalog CRUD: everything about a product EXCEPT its stock level.
//!
//! Quantity changes go through the stock ledger, never through here; the
//! update path cannot write the quantity column, so a catalog edit based on
//! a stale read can never clobber stock movements that landed in between.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{OpsError, OpsResult};
use till_core::validation::{
    validate_initial_quantity, validate_price_cents, validate_required_text, validate_text,
};
use till_core::{Product, ValidationError};
use till_db::repository::product::generate_product_id;
use till_db::Database;

/// Fields for creating a product. Initial quantity is accepted here once;
/// all later quantity changes go through the stock ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price_cents: i64,
    pub initial_quantity: i64,
}

/// Editable fields of an existing product. Deliberately has no quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price_cents: i64,
}

/// Catalog operations over the product store.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    db: Database,
}

impl ProductCatalog {
    pub fn new(db: Database) -> Self {
        ProductCatalog { db }
    }

    /// Lists all products, sorted by name.
    pub async fn list(&self) -> OpsResult<Vec<Product>> {
        Ok(self.db.products().list().await?)
    }

    /// Gets one product by ID.
    pub async fn get(&self, id: &str) -> OpsResult<Product> {
        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| OpsError::ProductNotFound { id: id.to_string() })
    }

    /// Creates a product and returns it with its generated ID.
    pub async fn create(&self, draft: ProductDraft) -> OpsResult<Product> {
        debug!(name = %draft.name, "Creating product");

        let name = validate_required_text("name", &draft.name)?;
        let description = validate_text("description", &draft.description)?;
        let category = validate_required_text("category", &draft.category)?;
        validate_price_cents(draft.price_cents)?;
        validate_initial_quantity(draft.initial_quantity)?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            name,
            description,
            category,
            price_cents: draft.price_cents,
            quantity: draft.initial_quantity,
            created_at: now,
            updated_at: now,
        };

        self.db.products().insert(&product).await?;

        info!(product_id = %product.id, name = %product.name, "Product created");

        Ok(product)
    }

    /// Updates a product's catalog fields and returns the updated product.
    ///
    /// Stock is untouched even if the caller's view of the product was
    /// stale.
    pub async fn update(&self, id: &str, changes: ProductChanges) -> OpsResult<Product> {
        debug!(product_id = %id, "Updating product");

        let name = validate_required_text("name", &changes.name)?;
        let description = validate_text("description", &changes.description)?;
        let category = validate_required_text("category", &changes.category)?;
        validate_price_cents(changes.price_cents)?;

        let mut product = self.get(id).await?;
        product.name = name;
        product.description = description;
        product.category = category;
        product.price_cents = changes.price_cents;
        product.updated_at = Utc::now();

        self.db.products().update(&product).await?;

        info!(product_id = %id, "Product updated");

        // Re-read: the stored quantity may have moved since our snapshot.
        self.get(id).await
    }

    /// Deletes a product. Requires `confirmed = true`; an unconfirmed call
    /// is rejected with no state change.
    ///
    /// Sale records referencing the product keep their name and price
    /// snapshots and remain readable.
    pub async fn delete(&self, id: &str, confirmed: bool) -> OpsResult<()> {
        if !confirmed {
            return Err(ValidationError::ConfirmationRequired {
                entity: "product".to_string(),
            }
            .into());
        }

        // Surface a clean not-found before attempting the delete.
        self.get(id).await?;
        self.db.products().delete(id).await?;

        info!(product_id = %id, "Product deleted");

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use till_db::DbConfig;

    fn draft(name: &str, price_cents: i64, initial_quantity: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: "Rich and bold".to_string(),
            category: "Beverages".to_string(),
            price_cents,
            initial_quantity,
        }
    }

    async fn catalog() -> (Database, ProductCatalog) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = ProductCatalog::new(db.clone());
        (db, catalog)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (_db, catalog) = catalog().await;

        let created = catalog.create(draft("Americano", 2500, 5)).await.unwrap();
        assert_eq!(created.quantity, 5);

        let fetched = catalog.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_trims_and_validates() {
        let (_db, catalog) = catalog().await;

        let created = catalog.create(draft("  Latte  ", 3000, 0)).await.unwrap();
        assert_eq!(created.name, "Latte");

        assert!(matches!(
            catalog.create(draft("", 2500, 5)).await.unwrap_err(),
            OpsError::InvalidInput(_)
        ));
        assert!(matches!(
            catalog.create(draft("Latte", -1, 5)).await.unwrap_err(),
            OpsError::InvalidInput(_)
        ));
        assert!(matches!(
            catalog.create(draft("Latte", 2500, -1)).await.unwrap_err(),
            OpsError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_price_above_cap() {
        let (_db, catalog) = catalog().await;

        // A price this large could overflow sale-total arithmetic when
        // multiplied by a quantity; it must never enter the catalog.
        let err = catalog
            .create(draft("Latte", i64::MAX / 2, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::InvalidInput(_)));
        assert!(catalog.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_leaves_quantity_alone() {
        let (db, catalog) = catalog().await;
        let created = catalog.create(draft("Americano", 2500, 5)).await.unwrap();

        // Stock moves between the caller's read and the update.
        db.products().adjust_quantity(&created.id, -2).await.unwrap();

        let updated = catalog
            .update(
                &created.id,
                ProductChanges {
                    name: "Americano Grande".to_string(),
                    description: created.description.clone(),
                    category: created.category.clone(),
                    price_cents: 2900,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Americano Grande");
        assert_eq!(updated.price_cents, 2900);
        assert_eq!(updated.quantity, 3);
    }

    #[tokio::test]
    async fn test_update_unknown_product() {
        let (_db, catalog) = catalog().await;

        let err = catalog
            .update(
                "ghost",
                ProductChanges {
                    name: "X".to_string(),
                    description: String::new(),
                    category: "Misc".to_string(),
                    price_cents: 100,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::ProductNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (_db, catalog) = catalog().await;
        let created = catalog.create(draft("Americano", 2500, 5)).await.unwrap();

        let err = catalog.delete(&created.id, false).await.unwrap_err();
        assert!(matches!(err, OpsError::InvalidInput(_)));
        assert!(catalog.get(&created.id).await.is_ok());

        catalog.delete(&created.id, true).await.unwrap();
        assert!(matches!(
            catalog.get(&created.id).await.unwrap_err(),
            OpsError::ProductNotFound { .. }
        ));
    }
}
