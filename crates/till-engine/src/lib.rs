//! # till-engine: Business Operations for Till
//!
//! The orchestration layer of the Till retail operations system: sale
//! processing, stock movements, catalog and customer management, and
//! reporting.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Till Layering                                 │
//! │                                                                         │
//! │  Embedding application (CLI, desktop shell, service...)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   till-engine (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │  Till ──┬── ProductCatalog     (catalog.rs)                     │   │
//! │  │         ├── CustomerDirectory  (customer.rs)                    │   │
//! │  │         ├── StockLedger        (stock.rs)   ─┐ shared            │   │
//! │  │         ├── SaleProcessor      (sale.rs)    ─┘ ProductLocks      │   │
//! │  │         └── ReportAggregator   (report.rs)                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  till-db (repositories over SQLite)  ──►  till-core (domain types)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_engine::{Till, TillConfig};
//!
//! till_engine::telemetry::init();
//!
//! let till = Till::open(TillConfig::new("path/to/till.db")).await?;
//!
//! let product = till.catalog().create(draft).await?;
//! let record = till.sales().record_sale(request).await?;
//! let summary = till.reports().summary().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod customer;
pub mod error;
pub mod report;
pub mod sale;
pub mod stock;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{ProductCatalog, ProductChanges, ProductDraft};
pub use customer::{CustomerDirectory, CustomerDraft};
pub use error::{OpsError, OpsResult};
pub use report::{InventoryReport, ReportAggregator, ReportConfig, Summary};
pub use sale::{SaleProcessor, SaleRequest};
pub use stock::{ProductLocks, StockLedger};

use std::sync::Arc;

use till_db::{Database, DbConfig};

// =============================================================================
// Engine Handle
// =============================================================================

/// Configuration for opening a [`Till`].
#[derive(Debug, Clone)]
pub struct TillConfig {
    pub db: DbConfig,
    pub report: ReportConfig,
}

impl TillConfig {
    /// Config with defaults for the given database path.
    pub fn new(db_path: impl Into<std::path::PathBuf>) -> Self {
        TillConfig {
            db: DbConfig::new(db_path),
            report: ReportConfig::default(),
        }
    }

    /// In-memory database, for tests and scratch sessions.
    pub fn in_memory() -> Self {
        TillConfig {
            db: DbConfig::in_memory(),
            report: ReportConfig::default(),
        }
    }

    pub fn report(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }
}

/// Handle to a running Till engine.
///
/// Cheap to clone; all clones share one connection pool and one product
/// lock registry. The lock registry is what serializes stock movements, so
/// every writer for a given database must go through clones of the same
/// `Till`.
#[derive(Debug, Clone)]
pub struct Till {
    db: Database,
    locks: Arc<ProductLocks>,
    report_config: ReportConfig,
}

impl Till {
    /// Opens the database (running migrations) and assembles the engine.
    pub async fn open(config: TillConfig) -> OpsResult<Self> {
        let db = Database::new(config.db).await?;
        Ok(Till {
            db,
            locks: Arc::new(ProductLocks::new()),
            report_config: config.report,
        })
    }

    /// Catalog operations (product CRUD, no stock changes).
    pub fn catalog(&self) -> ProductCatalog {
        ProductCatalog::new(self.db.clone())
    }

    /// Customer directory operations.
    pub fn customers(&self) -> CustomerDirectory {
        CustomerDirectory::new(self.db.clone())
    }

    /// Stock movements (restock, corrections).
    pub fn stock(&self) -> StockLedger {
        StockLedger::new(self.db.clone(), self.locks.clone())
    }

    /// Sale recording and history.
    pub fn sales(&self) -> SaleProcessor {
        SaleProcessor::new(self.db.clone(), self.locks.clone())
    }

    /// Read-only reports.
    pub fn reports(&self) -> ReportAggregator {
        ReportAggregator::new(self.db.clone(), self.report_config.clone())
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.db.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_in_memory_and_roundtrip() {
        let till = Till::open(TillConfig::in_memory()).await.unwrap();

        let product = till
            .catalog()
            .create(ProductDraft {
                name: "Americano".to_string(),
                description: String::new(),
                category: "Beverages".to_string(),
                price_cents: 2500,
                initial_quantity: 5,
            })
            .await
            .unwrap();

        let record = till
            .sales()
            .record_sale(SaleRequest {
                product_id: product.id.clone(),
                quantity: 2,
                tendered_cents: 6000,
            })
            .await
            .unwrap();
        assert_eq!(record.change_cents, 1000);

        let restocked = till.stock().restock(&product.id, 10).await.unwrap();
        assert_eq!(restocked.quantity, 13);

        let summary = till.reports().summary().await.unwrap();
        assert_eq!(summary.product_count, 1);
        assert_eq!(summary.sale_count, 1);
        assert_eq!(summary.total_sales_cents, 5000);

        till.close().await;
    }

    #[tokio::test]
    async fn test_clones_share_lock_registry() {
        let till = Till::open(TillConfig::in_memory()).await.unwrap();
        let clone = till.clone();
        assert!(Arc::ptr_eq(&till.locks, &clone.locks));
    }
}
