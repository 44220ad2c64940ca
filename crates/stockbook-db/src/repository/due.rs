//! # Due Repository
//!
//! Database operations for due entries. Settling a due deletes the row;
//! no paid history is kept.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockbook_core::due::new_due_entry;
use stockbook_core::{DueEntry, Money, NewDue, SellerDues};

/// Repository for due entry database operations.
#[derive(Debug, Clone)]
pub struct DueRepository {
    pool: SqlitePool,
}

impl DueRepository {
    /// Creates a new DueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DueRepository { pool }
    }

    /// Records a due. Fails with InvalidAmount unless the amount is positive.
    pub async fn create(&self, input: &NewDue) -> DbResult<DueEntry> {
        let entry = new_due_entry(Uuid::new_v4().to_string(), input, Utc::now())?;

        debug!(
            id = %entry.id,
            seller = %entry.seller_name,
            shop = %entry.shop_name,
            amount_cents = entry.due_amount_cents,
            "Creating due entry"
        );

        sqlx::query(
            r#"
            INSERT INTO due_entries (
                id, seller_name, shop_name, due_amount_cents, date_added, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.seller_name)
        .bind(&entry.shop_name)
        .bind(entry.due_amount_cents)
        .bind(entry.date_added)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Gets a due entry by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DueEntry>> {
        let entry = sqlx::query_as::<_, DueEntry>(
            r#"
            SELECT id, seller_name, shop_name, due_amount_cents, date_added, created_at
            FROM due_entries
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Lists dues most recent first, optionally for one seller.
    pub async fn list(&self, seller_name: Option<&str>) -> DbResult<Vec<DueEntry>> {
        let entries = sqlx::query_as::<_, DueEntry>(
            r#"
            SELECT id, seller_name, shop_name, due_amount_cents, date_added, created_at
            FROM due_entries
            WHERE ?1 IS NULL OR seller_name = ?1
            ORDER BY date_added DESC, created_at DESC, rowid DESC
            "#,
        )
        .bind(seller_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Settles (deletes) a due entry.
    pub async fn settle(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM due_entries WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Due entry", id));
        }

        info!(id = %id, "Due entry settled");
        Ok(())
    }

    /// Σ due amount over a seller's unsettled entries; zero if none.
    pub async fn total_for_seller(&self, seller_name: &str) -> DbResult<Money> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(due_amount_cents), 0) FROM due_entries WHERE seller_name = ?1",
        )
        .bind(seller_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(total))
    }

    /// A seller's dues with their total; an empty aggregate when none.
    pub async fn seller_dues(&self, seller_name: &str) -> DbResult<SellerDues> {
        let entries = self.list(Some(seller_name)).await?;
        Ok(SellerDues::collect(seller_name, entries))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
