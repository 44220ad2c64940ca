//! # Seller Repository
//!
//! Read-only seller views. Sellers are not stored; every name here comes
//! from `sales_records.seller_name`, and the summaries are computed by
//! `stockbook_core::seller` over freshly loaded records and dues.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::due::DueRepository;
use crate::repository::sale::SaleRepository;
use stockbook_core::seller::{monthly_summary, search_sellers, seller_summary};
use stockbook_core::validation::validate_search_query;
use stockbook_core::{MonthlySummary, SellerSummary, YearMonth};

/// Read-only aggregator over sales records and due entries.
#[derive(Debug, Clone)]
pub struct SellerRepository {
    sales: SaleRepository,
    dues: DueRepository,
}

impl SellerRepository {
    /// Creates a new SellerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SellerRepository {
            sales: SaleRepository::new(pool.clone()),
            dues: DueRepository::new(pool),
        }
    }

    /// Every seller that has recorded a sale, sorted.
    pub async fn list(&self) -> DbResult<Vec<String>> {
        self.sales.seller_names().await
    }

    /// Sellers whose name contains `query`, ignoring case.
    pub async fn search(&self, query: &str) -> DbResult<Vec<String>> {
        let query = validate_search_query(query)?;
        let sellers = self.list().await?;
        Ok(search_sellers(&sellers, &query))
    }

    /// All-time summary. Empty (zero records) for an unknown seller.
    pub async fn summary(&self, seller_name: &str) -> DbResult<SellerSummary> {
        let records = self.sales.list(Some(seller_name)).await?;
        debug!(seller = %seller_name, records = records.len(), "Building seller summary");
        Ok(seller_summary(seller_name, records))
    }

    /// Summary of one calendar month, with the dues added in that month.
    pub async fn monthly(&self, seller_name: &str, month: YearMonth) -> DbResult<MonthlySummary> {
        let records = self.sales.list(Some(seller_name)).await?;
        let dues = self.dues.list(Some(seller_name)).await?;
        debug!(seller = %seller_name, month = %month, "Building monthly summary");
        Ok(monthly_summary(seller_name, month, records, dues))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
