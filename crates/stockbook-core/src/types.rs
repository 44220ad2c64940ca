//! # Domain Types
//!
//! Core domain types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────┐                      │
//! │  │      Product        │   │   PurchaseOrder     │                      │
//! │  │  ─────────────────  │   │  ─────────────────  │                      │
//! │  │  initial_stock      │◄──│  product_id (ref)   │  delivery adds to    │
//! │  │  delivered_quantity │   │  product_name (snap)│  delivered_quantity  │
//! │  │  sold_quantity      │   │  status             │                      │
//! │  │  buying/selling     │   │  total_cost_cents   │                      │
//! │  └─────────────────────┘   └─────────────────────┘                      │
//! │            ▲                                                            │
//! │            │ sale adds to sold_quantity                                 │
//! │  ┌─────────┴───────────┐   ┌─────────────────────┐                      │
//! │  │    SalesRecord      │   │     DueEntry        │                      │
//! │  │  ─────────────────  │   │  ─────────────────  │                      │
//! │  │  seller_name        │   │  seller_name        │                      │
//! │  │  items[SalesItem]   │   │  shop_name          │                      │
//! │  │  total / due / cash │   │  due_amount_cents   │                      │
//! │  └─────────────────────┘   └─────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Purchase orders and sales items copy the product name at creation time.
//! Later renames do not rewrite history; the copy is what was sold/ordered.
//!
//! ## Money Fields
//! Amounts are stored as `*_cents: i64` and exposed as [`Money`] through
//! accessor methods.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A stocked product and its inventory counters.
///
/// Derived values (remaining quantity, cost, revenue, profit) are never
/// stored; see [`crate::ledger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Stock on hand when the product was created. Never changes.
    pub initial_stock: i64,

    /// Starts equal to `initial_stock`; grows only through deliveries.
    pub delivered_quantity: i64,

    /// Grows only through accepted sales.
    pub sold_quantity: i64,

    /// Current buying price in cents.
    pub buying_price_cents: i64,

    /// Current selling price in cents.
    pub selling_price_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the buying price as Money.
    #[inline]
    pub fn buying_price(&self) -> Money {
        Money::from_cents(self.buying_price_cents)
    }

    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub initial_stock: i64,
    pub buying_price_cents: i64,
    pub selling_price_cents: i64,
}

/// Input for editing a product.
///
/// Only descriptive fields and prices are editable. Stock counters move
/// exclusively through deliveries and sales.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductUpdate {
    pub name: String,
    pub buying_price_cents: i64,
    pub selling_price_cents: i64,
}

// =============================================================================
// Purchase Order
// =============================================================================

/// Lifecycle state of a purchase order. One-way: pending → delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PurchaseOrderStatus {
    /// Ordered, not yet received.
    Pending,
    /// Received; quantity has been added to the product.
    Delivered,
}

impl Default for PurchaseOrderStatus {
    fn default() -> Self {
        PurchaseOrderStatus::Pending
    }
}

impl fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseOrderStatus::Pending => write!(f, "pending"),
            PurchaseOrderStatus::Delivered => write!(f, "delivered"),
        }
    }
}

impl FromStr for PurchaseOrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PurchaseOrderStatus::Pending),
            "delivered" => Ok(PurchaseOrderStatus::Delivered),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: vec!["pending".to_string(), "delivered".to_string()],
            }),
        }
    }
}

/// A request to restock a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PurchaseOrder {
    pub id: String,
    pub product_id: String,
    /// Product name at time of order (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Buying price at time of order; may differ from the product's current price.
    pub buying_price_cents: i64,
    /// `quantity × buying_price`, fixed at creation.
    pub total_cost_cents: i64,
    pub status: PurchaseOrderStatus,
    #[ts(as = "String")]
    pub order_date: NaiveDate,
    #[ts(as = "Option<String>")]
    pub delivery_date: Option<NaiveDate>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Returns the total cost as Money.
    #[inline]
    pub fn total_cost(&self) -> Money {
        Money::from_cents(self.total_cost_cents)
    }

    #[inline]
    pub fn is_delivered(&self) -> bool {
        self.status == PurchaseOrderStatus::Delivered
    }
}

/// Input for creating a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewPurchaseOrder {
    pub product_id: String,
    pub quantity: i64,
    pub buying_price_cents: i64,
}

// =============================================================================
// Sales Record
// =============================================================================

/// A line item in a sales record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesItem {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    pub selling_price_cents: i64,
    /// `quantity × selling_price`.
    pub total_price_cents: i64,
}

impl SalesItem {
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// A multi-line sale attributed to a seller.
///
/// Append-only once persisted. `cash + due == total` holds exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesRecord {
    pub id: String,
    pub seller_name: String,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<SalesItem>,
    pub total_sales_amount_cents: i64,
    /// Portion extended as credit.
    pub total_due_amount_cents: i64,
    /// Portion collected immediately.
    pub cash_sale_amount_cents: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SalesRecord {
    #[inline]
    pub fn total_sales_amount(&self) -> Money {
        Money::from_cents(self.total_sales_amount_cents)
    }

    #[inline]
    pub fn total_due_amount(&self) -> Money {
        Money::from_cents(self.total_due_amount_cents)
    }

    #[inline]
    pub fn cash_sale_amount(&self) -> Money {
        Money::from_cents(self.cash_sale_amount_cents)
    }

    /// Sum of quantities across all line items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// One requested line of a new sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSaleLine {
    pub product_id: String,
    pub quantity: i64,
    pub selling_price_cents: i64,
}

/// Input for recording a sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSale {
    pub seller_name: String,
    pub items: Vec<NewSaleLine>,
    #[serde(default)]
    pub total_due_amount_cents: i64,
    /// Optional client-computed total; checked against the server total.
    #[serde(default)]
    pub total_sales_amount_cents: Option<i64>,
    #[ts(as = "String")]
    pub date: NaiveDate,
}

// =============================================================================
// Due Entry
// =============================================================================

/// Unpaid credit a seller reported against a shop.
///
/// Removed outright when settled; no paid history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DueEntry {
    pub id: String,
    pub seller_name: String,
    pub shop_name: String,
    pub due_amount_cents: i64,
    #[ts(as = "String")]
    pub date_added: NaiveDate,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl DueEntry {
    #[inline]
    pub fn due_amount(&self) -> Money {
        Money::from_cents(self.due_amount_cents)
    }
}

/// Input for recording a due.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewDue {
    pub seller_name: String,
    pub shop_name: String,
    pub due_amount_cents: i64,
    #[ts(as = "String")]
    pub date_added: NaiveDate,
}

// =============================================================================
// Year-Month
// =============================================================================

/// A calendar month, written `YYYY-MM`.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use stockbook_core::YearMonth;
///
/// let month: YearMonth = "2026-10".parse().unwrap();
/// assert!(month.contains(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()));
/// assert!(!month.contains(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()));
/// assert_eq!(month.to_string(), "2026-10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year-month; `None` if the month is not 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(YearMonth { year, month })
    }

    /// The month a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Whether the date falls in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        YearMonth::of(date) == *self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "month".to_string(),
            reason: "expected YYYY-MM".to_string(),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
