//! # Report Aggregator
//!
//! Read-only views over the three stores: inventory value, low-stock
//! alerts, sales totals and counts.
//!
//! Sales totals come from the totals frozen into sale records, never from a
//! recomputation against current prices, so yesterday's revenue does not
//! change when today's prices do.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OpsResult;
use till_core::{Money, Product, DEFAULT_LOW_STOCK_THRESHOLD};
use till_db::Database;

// =============================================================================
// Configuration
// =============================================================================

/// Reporting knobs. Defaults match a small single-till shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    /// Products with quantity strictly below this are flagged low.
    pub low_stock_threshold: i64,
    /// Symbol prepended to formatted amounts ("$", "M", "R", ...).
    pub currency_symbol: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            currency_symbol: "$".to_string(),
        }
    }
}

// =============================================================================
// Report Payloads
// =============================================================================

/// One product's line in the inventory report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLine {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub quantity: i64,
    pub value_cents: i64,
    pub low_stock: bool,
}

/// Full inventory report: one line per product plus the total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub lines: Vec<InventoryLine>,
    pub total_value_cents: i64,
    pub total_value_display: String,
    pub low_stock_count: usize,
}

/// Headline numbers for a dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub product_count: i64,
    pub customer_count: i64,
    pub sale_count: i64,
    pub total_inventory_value_cents: i64,
    pub total_sales_cents: i64,
    pub total_sales_display: String,
    pub low_stock_count: usize,
}

// =============================================================================
// Aggregator
// =============================================================================

/// Read-only reporting over products, customers and sales.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    db: Database,
    config: ReportConfig,
}

impl ReportAggregator {
    pub fn new(db: Database, config: ReportConfig) -> Self {
        ReportAggregator { db, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Total inventory value: sum of price x quantity over all products.
    pub async fn total_inventory_value(&self) -> OpsResult<Money> {
        let cents = self.db.products().inventory_value_cents().await?;
        Ok(Money::from_cents(cents))
    }

    /// Products with quantity strictly below the threshold, lowest quantity
    /// first. `None` uses the configured threshold.
    pub async fn low_stock_items(&self, threshold: Option<i64>) -> OpsResult<Vec<Product>> {
        let threshold = threshold.unwrap_or(self.config.low_stock_threshold);
        debug!(threshold = %threshold, "Low stock query");
        Ok(self.db.products().low_stock(threshold).await?)
    }

    /// Total sales value: sum of recorded sale totals.
    pub async fn total_sales_value(&self) -> OpsResult<Money> {
        let cents = self.db.sales().total_sales_cents().await?;
        Ok(Money::from_cents(cents))
    }

    /// Number of customers in the directory.
    pub async fn customer_count(&self) -> OpsResult<i64> {
        Ok(self.db.customers().count().await?)
    }

    /// Builds the per-product inventory report.
    pub async fn inventory_report(&self) -> OpsResult<InventoryReport> {
        let products = self.db.products().list().await?;
        let threshold = self.config.low_stock_threshold;

        let lines: Vec<InventoryLine> = products
            .iter()
            .map(|p| InventoryLine {
                product_id: p.id.clone(),
                name: p.name.clone(),
                category: p.category.clone(),
                price_cents: p.price_cents,
                quantity: p.quantity,
                value_cents: p.inventory_value().cents(),
                low_stock: p.is_low_stock(threshold),
            })
            .collect();

        let total_value_cents: i64 = lines.iter().map(|l| l.value_cents).sum();
        let low_stock_count = lines.iter().filter(|l| l.low_stock).count();

        Ok(InventoryReport {
            lines,
            total_value_cents,
            total_value_display: Money::from_cents(total_value_cents)
                .format_with_symbol(&self.config.currency_symbol),
            low_stock_count,
        })
    }

    /// Builds the dashboard summary.
    pub async fn summary(&self) -> OpsResult<Summary> {
        let product_count = self.db.products().count().await?;
        let customer_count = self.db.customers().count().await?;
        let sale_count = self.db.sales().count().await?;
        let total_inventory_value_cents = self.db.products().inventory_value_cents().await?;
        let total_sales_cents = self.db.sales().total_sales_cents().await?;
        let low_stock_count = self
            .db
            .products()
            .low_stock(self.config.low_stock_threshold)
            .await?
            .len();

        Ok(Summary {
            product_count,
            customer_count,
            sale_count,
            total_inventory_value_cents,
            total_sales_cents,
            total_sales_display: Money::from_cents(total_sales_cents)
                .format_with_symbol(&self.config.currency_symbol),
            low_stock_count,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
