//! # Sale Repository
//!
//! Database operations for sales records and their line items.
//!
//! ## Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create(NewSale)                                   │
//! │                                                                         │
//! │  1. shape validation (no connection needed)                            │
//! │                                                                         │
//! │  BEGIN IMMEDIATE                                                       │
//! │  2. load every referenced product                                      │
//! │  3. price_sale() ── NotFound / InsufficientStock / InvalidAmount       │
//! │  4. INSERT sales_records                                               │
//! │  5. INSERT sales_items (position = line order)                         │
//! │  6. per product: sold += Σ qty  WHERE remaining >= Σ qty               │
//! │        └── lost a race → InsufficientStock (ROLLBACK)                  │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected sale leaves no record, no items and no counter changes.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::product::{add_sold, fetch_product};
use stockbook_core::sale::price_sale;
use stockbook_core::validation::validate_new_sale;
use stockbook_core::{NewSale, Product, SalesItem, SalesRecord};

/// A stored line item with the record it belongs to.
#[derive(Debug, sqlx::FromRow)]
struct SalesItemRow {
    sales_record_id: String,
    #[sqlx(flatten)]
    item: SalesItem,
}

/// Repository for sales record database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale and applies its stock deltas atomically.
    ///
    /// ## Errors
    /// - `Validation` for malformed input
    /// - `NotFound` naming the first missing product
    /// - `InsufficientStock` if any product's combined quantity exceeds
    ///   what remains
    /// - `InvalidAmount` if the due exceeds the total, or a supplied total
    ///   disagrees with the line items
    pub async fn create(&self, input: &NewSale) -> DbResult<SalesRecord> {
        let input = validate_new_sale(input)?;

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let mut products: Vec<Product> = Vec::new();
        for line in &input.items {
            let product_id = line.product_id.trim();
            if products.iter().any(|p| p.id == product_id) {
                continue;
            }
            if let Some(product) = fetch_product(&mut tx, product_id).await? {
                products.push(product);
            }
        }

        let priced = price_sale(&input, &products)?;
        let deltas = priced.stock_deltas.clone();
        let record = priced.into_record(Uuid::new_v4().to_string(), Utc::now());

        debug!(
            id = %record.id,
            seller = %record.seller_name,
            lines = record.items.len(),
            total_cents = record.total_sales_amount_cents,
            "Creating sales record"
        );

        insert_record(&mut tx, &record).await?;

        for delta in &deltas {
            add_sold(&mut tx, &delta.product_id, delta.quantity).await?;
        }

        tx.commit().await?;

        info!(
            id = %record.id,
            seller = %record.seller_name,
            total = %record.total_sales_amount(),
            due = %record.total_due_amount(),
            "Sales record created"
        );

        Ok(record)
    }

    /// Gets a sales record (with items) by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SalesRecord>> {
        let record = sqlx::query_as::<_, SalesRecord>(
            r#"
            SELECT
                id, seller_name, total_sales_amount_cents, total_due_amount_cents,
                cash_sale_amount_cents, date, created_at
            FROM sales_records
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut record) = record else {
            return Ok(None);
        };

        record.items = sqlx::query_as::<_, SalesItem>(
            r#"
            SELECT product_id, product_name, quantity, selling_price_cents, total_price_cents
            FROM sales_items
            WHERE sales_record_id = ?1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(record))
    }

    /// Gets a sales record by ID, failing with NotFound.
    pub async fn get(&self, id: &str) -> DbResult<SalesRecord> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Sales record", id))
    }

    /// Lists records newest first (by sale date), optionally for one seller.
    pub async fn list(&self, seller_name: Option<&str>) -> DbResult<Vec<SalesRecord>> {
        let mut records = sqlx::query_as::<_, SalesRecord>(
            r#"
            SELECT
                id, seller_name, total_sales_amount_cents, total_due_amount_cents,
                cash_sale_amount_cents, date, created_at
            FROM sales_records
            WHERE ?1 IS NULL OR seller_name = ?1
            ORDER BY date DESC, created_at DESC, rowid DESC
            "#,
        )
        .bind(seller_name)
        .fetch_all(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, SalesItemRow>(
            r#"
            SELECT
                si.sales_record_id, si.product_id, si.product_name, si.quantity,
                si.selling_price_cents, si.total_price_cents
            FROM sales_items si
            JOIN sales_records sr ON sr.id = si.sales_record_id
            WHERE ?1 IS NULL OR sr.seller_name = ?1
            ORDER BY si.sales_record_id, si.position
            "#,
        )
        .bind(seller_name)
        .fetch_all(&self.pool)
        .await?;

        let mut items: HashMap<String, Vec<SalesItem>> = HashMap::new();
        for row in rows {
            items.entry(row.sales_record_id).or_default().push(row.item);
        }
        for record in &mut records {
            record.items = items.remove(&record.id).unwrap_or_default();
        }

        debug!(count = records.len(), seller = ?seller_name, "Listed sales records");
        Ok(records)
    }

    /// Distinct seller names, sorted.
    pub async fn seller_names(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT seller_name FROM sales_records ORDER BY seller_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// Counts sales records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_records")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn insert_record(conn: &mut SqliteConnection, record: &SalesRecord) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales_records (
            id, seller_name, total_sales_amount_cents, total_due_amount_cents,
            cash_sale_amount_cents, date, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&record.id)
    .bind(&record.seller_name)
    .bind(record.total_sales_amount_cents)
    .bind(record.total_due_amount_cents)
    .bind(record.cash_sale_amount_cents)
    .bind(record.date)
    .bind(record.created_at)
    .execute(&mut *conn)
    .await?;

    for (position, item) in record.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO sales_items (
                sales_record_id, position, product_id, product_name,
                quantity, selling_price_cents, total_price_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(position as i64)
        .bind(&item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.selling_price_cents)
        .bind(item.total_price_cents)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
