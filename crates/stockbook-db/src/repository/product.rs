//! # Product Repository
//!
//! Database operations for products and their stock counters.
//!
//! ## Counter Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stock counters are only ever changed by single conditional UPDATEs:   │
//! │                                                                         │
//! │  delivery:  delivered = delivered + q  WHERE id = ?                    │
//! │                                          AND delivered <= MAX - q      │
//! │  sale:      sold      = sold + q       WHERE id = ?                    │
//! │                                          AND delivered - sold >= q     │
//! │                                                                         │
//! │  0 rows affected ──► re-read the product                               │
//! │                        ├── missing  → NotFound                         │
//! │                        └── present  → OutOfRange (delivery)            │
//! │                                       InsufficientStock (sale)         │
//! │                                                                         │
//! │  There is no read-modify-write window, so two concurrent sales can     │
//! │  never both take the last unit.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `pub(crate)` helpers take a `&mut SqliteConnection` so the purchase
//! order and sale repositories can run them inside their own transactions.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockbook_core::ledger::new_product;
use stockbook_core::validation::validate_quantity;
use stockbook_core::{
    CoreError, InventoryTotals, NewProduct, Product, ProductReport, ProductUpdate,
    MAX_DELIVERED_QUANTITY,
};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Creates a product with `delivered_quantity = initial_stock`.
    pub async fn create(&self, input: &NewProduct) -> DbResult<Product> {
        let product = new_product(Uuid::new_v4().to_string(), input, Utc::now())?;

        debug!(id = %product.id, name = %product.name, "Creating product");
        self.insert(&product).await?;

        Ok(product)
    }

    /// Inserts a fully built product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, initial_stock, delivered_quantity, sold_quantity,
                buying_price_cents, selling_price_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.initial_stock)
        .bind(product.delivered_quantity)
        .bind(product.sold_quantity)
        .bind(product.buying_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    /// Gets a product by ID, failing with NotFound.
    pub async fn get(&self, id: &str) -> DbResult<Product> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Lists all products, newest first.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, initial_stock, delivered_quantity, sold_quantity,
                buying_price_cents, selling_price_cents, created_at, updated_at
            FROM products
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Lists all products with their derived values.
    pub async fn reports(&self) -> DbResult<Vec<ProductReport>> {
        Ok(self.list().await?.iter().map(Product::report).collect())
    }

    /// Sums derived values over every product.
    pub async fn inventory_totals(&self) -> DbResult<InventoryTotals> {
        let products = self.list().await?;
        Ok(InventoryTotals::from_products(&products))
    }

    /// Edits name and prices. Stock counters are never written here.
    pub async fn update(&self, id: &str, update: &ProductUpdate) -> DbResult<Product> {
        let mut product = self.get(id).await?;
        product.apply_update(update, Utc::now())?;

        debug!(id = %id, name = %product.name, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                name = ?2,
                buying_price_cents = ?3,
                selling_price_cents = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&product.name)
        .bind(product.buying_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        // Re-read so concurrent counter changes are reflected.
        self.get(id).await
    }

    /// Deletes a product. Orders and sales keep their name snapshots.
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

    /// Remaining quantity; 0 when the product doesn't exist.
    pub async fn remaining(&self, id: &str) -> DbResult<i64> {
        Ok(self
            .get_by_id(id)
            .await?
            .map(|p| p.remaining_quantity())
            .unwrap_or(0))
    }

    /// Adds delivered stock.
    pub async fn apply_delivery(&self, id: &str, quantity: i64) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        add_delivered(&mut conn, id, quantity).await?;
        fetch_product(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Records sold stock, failing with InsufficientStock if it would
    /// exceed what remains.
    pub async fn apply_sale(&self, id: &str, quantity: i64) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        add_sold(&mut conn, id, quantity).await?;
        fetch_product(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Counts products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-level helpers (usable inside transactions)
// =============================================================================

pub(crate) async fn fetch_product(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT
            id, name, initial_stock, delivered_quantity, sold_quantity,
            buying_price_cents, selling_price_cents, created_at, updated_at
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(product)
}

pub(crate) async fn add_delivered(conn: &mut SqliteConnection, id: &str, quantity: i64) -> DbResult<()> {
    validate_quantity("quantity", quantity)?;

    debug!(id = %id, quantity, "Adding delivered stock");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET
            delivered_quantity = delivered_quantity + ?2,
            updated_at = ?3
        WHERE id = ?1
          AND delivered_quantity <= ?4 - ?2
        "#,
    )
    .bind(id)
    .bind(quantity)
    .bind(Utc::now())
    .bind(MAX_DELIVERED_QUANTITY)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(());
    }

    let Some(mut product) = fetch_product(conn, id).await? else {
        return Err(DbError::not_found("Product", id));
    };

    warn!(
        id = %id,
        delivered = product.delivered_quantity,
        requested = quantity,
        "Rejected delivery: delivered quantity ceiling"
    );
    product.apply_delivery(quantity)?;
    Err(DbError::Internal(format!(
        "delivery of {quantity} to product {id} was not applied"
    )))
}

pub(crate) async fn add_sold(conn: &mut SqliteConnection, id: &str, quantity: i64) -> DbResult<()> {
    if quantity <= 0 {
        return Err(stockbook_core::ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    debug!(id = %id, quantity, "Adding sold stock");

    let result = sqlx::query(
        r#"
        UPDATE products
        SET
            sold_quantity = sold_quantity + ?2,
            updated_at = ?3
        WHERE id = ?1
          AND delivered_quantity - sold_quantity >= ?2
        "#,
    )
    .bind(id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() > 0 {
        return Ok(());
    }

    match fetch_product(conn, id).await? {
        None => Err(DbError::not_found("Product", id)),
        Some(product) => {
            warn!(
                id = %id,
                available = product.remaining_quantity(),
                requested = quantity,
                "Rejected sale: insufficient stock"
            );
            Err(CoreError::InsufficientStock {
                product_id: product.id,
                product_name: product.name.clone(),
                available: product.delivered_quantity - product.sold_quantity,
                requested: quantity,
            }
            .into())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use stockbook_core::StockStatus;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn widget() -> NewProduct {
        NewProduct {
            name: "Widget".to_string(),
            initial_stock: 100,
            buying_price_cents: 200,
            selling_price_cents: 500,
        }
    }

    #[tokio::test]
    async fn test_create_product_counters() {
        let db = setup().await;
        let created = db.products().create(&widget()).await.unwrap();

        let stored = db.products().get(&created.id).await.unwrap();
        assert_eq!(stored.delivered_quantity, 100);
        assert_eq!(stored.sold_quantity, 0);
        assert_eq!(stored.remaining_quantity(), 100);
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_create_product_rejects_invalid_input() {
        let db = setup().await;
        let err = db
            .products()
            .create(&NewProduct {
                name: "   ".to_string(),
                ..widget()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::Validation(_))));
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_apply_sale_and_insufficient_stock() {
        let db = setup().await;
        let repo = db.products();
        let product = repo.create(&widget()).await.unwrap();

        let after = repo.apply_sale(&product.id, 30).await.unwrap();
        assert_eq!(after.remaining_quantity(), 70);

        let err = repo.apply_sale(&product.id, 71).await.unwrap_err();
        match err {
            DbError::Core(CoreError::InsufficientStock {
                product_name,
                available,
                requested,
                ..
            }) => {
                assert_eq!(product_name, "Widget");
                assert_eq!(available, 70);
                assert_eq!(requested, 71);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.remaining(&product.id).await.unwrap(), 70);
    }

    #[tokio::test]
    async fn test_apply_to_missing_product() {
        let db = setup().await;
        let repo = db.products();

        assert!(matches!(
            repo.apply_sale("missing", 1).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            repo.apply_delivery("missing", 1).await,
            Err(DbError::NotFound { .. })
        ));
        assert_eq!(repo.remaining("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_apply_delivery() {
        let db = setup().await;
        let repo = db.products();
        let product = repo.create(&widget()).await.unwrap();

        let after = repo.apply_delivery(&product.id, 25).await.unwrap();
        assert_eq!(after.delivered_quantity, 125);
        assert_eq!(after.initial_stock, 100);
    }

    #[tokio::test]
    async fn test_delivery_past_ceiling_is_rejected() {
        let db = setup().await;
        let repo = db.products();
        let product = repo.create(&widget()).await.unwrap();
        sqlx::query("UPDATE products SET delivered_quantity = ?1 WHERE id = ?2")
            .bind(MAX_DELIVERED_QUANTITY - 5)
            .bind(&product.id)
            .execute(&repo.pool)
            .await
            .unwrap();

        let err = repo.apply_delivery(&product.id, 6).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::Validation(stockbook_core::ValidationError::OutOfRange { .. }))
        ));

        let after = repo.apply_delivery(&product.id, 5).await.unwrap();
        assert_eq!(after.delivered_quantity, MAX_DELIVERED_QUANTITY);
        assert!(repo.apply_delivery(&product.id, 1).await.is_err());

        let stored = repo.get(&product.id).await.unwrap();
        assert_eq!(stored.delivered_quantity, MAX_DELIVERED_QUANTITY);
        let reports = repo.reports().await.unwrap();
        assert_eq!(reports[0].remaining_quantity, MAX_DELIVERED_QUANTITY);
        assert!(repo.inventory_totals().await.is_ok());
    }

    #[tokio::test]
    async fn test_update_keeps_counters() {
        let db = setup().await;
        let repo = db.products();
        let product = repo.create(&widget()).await.unwrap();
        repo.apply_sale(&product.id, 10).await.unwrap();

        let updated = repo
            .update(
                &product.id,
                &ProductUpdate {
                    name: "Widget Pro".to_string(),
                    buying_price_cents: 300,
                    selling_price_cents: 700,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Widget Pro");
        assert_eq!(updated.sold_quantity, 10);
        assert_eq!(updated.delivered_quantity, 100);
        assert_eq!(updated.selling_price_cents, 700);
    }

    #[tokio::test]
    async fn test_delete_product() {
        let db = setup().await;
        let repo = db.products();
        let product = repo.create(&widget()).await.unwrap();

        repo.delete(&product.id).await.unwrap();
        assert!(repo.get_by_id(&product.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&product.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_reports_and_totals() {
        let db = setup().await;
        let repo = db.products();
        let a = repo.create(&widget()).await.unwrap();
        repo.create(&NewProduct {
            name: "Gadget".to_string(),
            initial_stock: 10,
            buying_price_cents: 1000,
            selling_price_cents: 1500,
        })
        .await
        .unwrap();
        repo.apply_sale(&a.id, 90).await.unwrap();

        let reports = repo.reports().await.unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].product.name, "Gadget");
        let widget_report = reports.iter().find(|r| r.product.id == a.id).unwrap();
        assert_eq!(widget_report.remaining_quantity, 10);
        assert_eq!(widget_report.stock_status, StockStatus::LowStock);

        let totals = repo.inventory_totals().await.unwrap();
        assert_eq!(totals.product_count, 2);
        assert_eq!(totals.total_remaining_quantity, 20);
        assert_eq!(totals.total_buying_cost_cents, 20000 + 10000);
        assert_eq!(totals.total_sales_value_cents, 45000);
        assert_eq!(totals.total_profit_loss_cents, 27000);
    }

    #[tokio::test]
    async fn test_concurrent_sales_never_oversell() {
        let db = setup().await;
        let repo = db.products();
        let product = repo.create(&widget()).await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                let id = product.id.clone();
                tokio::spawn(async move { repo.apply_sale(&id, 10).await.is_ok() })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 10);
        let stored = repo.get(&product.id).await.unwrap();
        assert_eq!(stored.sold_quantity, 100);
        assert_eq!(stored.remaining_quantity(), 0);
    }
}
