//! # Purchase Order Repository
//!
//! Database operations for purchase orders.
//!
//! ## Delivery Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  mark_delivered(order_id)                                              │
//! │                                                                         │
//! │  BEGIN IMMEDIATE                                                       │
//! │   ├── UPDATE purchase_orders SET status = 'delivered', delivery_date   │
//! │   │     WHERE id = ? AND status = 'pending'                            │
//! │   │        └── 0 rows → NotFound | AlreadyDelivered   (ROLLBACK)       │
//! │   ├── UPDATE products SET delivered_quantity += order.quantity         │
//! │   │        └── 0 rows → NotFound | OutOfRange         (ROLLBACK)       │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The conditional status flip means two racing deliveries of the same
//! order apply exactly one increment.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::product::{add_delivered, fetch_product};
use stockbook_core::purchase::new_purchase_order;
use stockbook_core::validation::validate_new_purchase_order;
use stockbook_core::{NewPurchaseOrder, PurchaseOrder, PurchaseOrderStatus};

/// Repository for purchase order database operations.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    pool: SqlitePool,
}

impl PurchaseOrderRepository {
    /// Creates a new PurchaseOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseOrderRepository { pool }
    }

    /// Creates a pending order, snapshotting the product name.
    ///
    /// Fails with NotFound if the product doesn't exist.
    pub async fn create(&self, input: &NewPurchaseOrder) -> DbResult<PurchaseOrder> {
        validate_new_purchase_order(input)?;

        let mut conn = self.pool.acquire().await?;
        let product_id = input.product_id.trim();
        let product = fetch_product(&mut conn, product_id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", product_id))?;

        let now = Utc::now();
        let order = new_purchase_order(
            Uuid::new_v4().to_string(),
            input,
            &product,
            now.date_naive(),
            now,
        )?;

        debug!(
            id = %order.id,
            product_id = %order.product_id,
            quantity = order.quantity,
            "Creating purchase order"
        );

        sqlx::query(
            r#"
            INSERT INTO purchase_orders (
                id, product_id, product_name, quantity, buying_price_cents,
                total_cost_cents, status, order_date, delivery_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&order.id)
        .bind(&order.product_id)
        .bind(&order.product_name)
        .bind(order.quantity)
        .bind(order.buying_price_cents)
        .bind(order.total_cost_cents)
        .bind(order.status)
        .bind(order.order_date)
        .bind(order.delivery_date)
        .bind(order.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(order)
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PurchaseOrder>> {
        let mut conn = self.pool.acquire().await?;
        fetch_order(&mut conn, id).await
    }

    /// Gets an order by ID, failing with NotFound.
    pub async fn get(&self, id: &str) -> DbResult<PurchaseOrder> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Purchase order", id))
    }

    /// Lists orders newest first, optionally filtered by status.
    pub async fn list(&self, status: Option<PurchaseOrderStatus>) -> DbResult<Vec<PurchaseOrder>> {
        let orders = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            SELECT
                id, product_id, product_name, quantity, buying_price_cents,
                total_cost_cents, status, order_date, delivery_date, created_at
            FROM purchase_orders
            WHERE ?1 IS NULL OR status = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Marks an order delivered and adds its quantity to the product, in
    /// one transaction.
    ///
    /// ## Errors
    /// - `NotFound` if the order (or its product) doesn't exist
    /// - `AlreadyDelivered` if the order was delivered before
    pub async fn mark_delivered(&self, id: &str) -> DbResult<PurchaseOrder> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let today = Utc::now().date_naive();

        let result = sqlx::query(
            r#"
            UPDATE purchase_orders
            SET
                status = 'delivered',
                delivery_date = ?2
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(today)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Dropping `tx` rolls back.
            let order = fetch_order(&mut tx, id)
                .await?
                .ok_or_else(|| DbError::not_found("Purchase order", id))?;
            warn!(id = %id, status = ?order.status, "Rejected delivery");
            order.ensure_pending()?;
            return Err(DbError::Internal(format!(
                "purchase order {id} is pending but was not updated"
            )));
        }

        let order = fetch_order(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Purchase order", id))?;

        add_delivered(&mut tx, &order.product_id, order.quantity).await?;

        tx.commit().await?;

        info!(
            id = %order.id,
            product_id = %order.product_id,
            quantity = order.quantity,
            "Purchase order delivered"
        );

        Ok(order)
    }
}

async fn fetch_order(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<PurchaseOrder>> {
    let order = sqlx::query_as::<_, PurchaseOrder>(
        r#"
        SELECT
            id, product_id, product_name, quantity, buying_price_cents,
            total_cost_cents, status, order_date, delivery_date, created_at
        FROM purchase_orders
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(order)
}

// =============================================================================
// Unit Tests
// =============================================================================
