//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! Everything Stockbook knows about stock, sales and dues lives here as
//! plain functions over plain data, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Single-page client (separate)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockbook-server (axum routes)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockbook-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌────────┐ ┌──────────┐ ┌────────┐ ┌───────┐ ┌────────────┐   │   │
//! │  │  │ ledger │ │ purchase │ │  sale  │ │  due  │ │   seller   │   │   │
//! │  │  │counters│ │ delivery │ │ pricing│ │credit │ │ summaries  │   │   │
//! │  │  └────────┘ └──────────┘ └────────┘ └───────┘ └────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              stockbook-db (SQLite, transactions)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, PurchaseOrder, SalesRecord, DueEntry)
//! - [`money`] - Money type with integer arithmetic
//! - [`ledger`] - Product counters, derived values, inventory totals
//! - [`purchase`] - Purchase order creation and delivery
//! - [`sale`] - Sale validation and pricing
//! - [`due`] - Due entries and per-seller totals
//! - [`seller`] - Seller and monthly summaries
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{NaiveDate, Utc};
//! use stockbook_core::{ledger::new_product, sale::price_sale, NewProduct, NewSale, NewSaleLine};
//!
//! let id = "550e8400-e29b-41d4-a716-446655440000".to_string();
//! let widget = new_product(
//!     id.clone(),
//!     &NewProduct {
//!         name: "Widget".to_string(),
//!         initial_stock: 100,
//!         buying_price_cents: 200,
//!         selling_price_cents: 500,
//!     },
//!     Utc::now(),
//! )
//! .unwrap();
//!
//! let priced = price_sale(
//!     &NewSale {
//!         seller_name: "Acme".to_string(),
//!         items: vec![NewSaleLine { product_id: id, quantity: 30, selling_price_cents: 500 }],
//!         total_due_amount_cents: 5000,
//!         total_sales_amount_cents: None,
//!         date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
//!     },
//!     &[widget],
//! )
//! .unwrap();
//!
//! assert_eq!(priced.total_sales_amount.cents(), 15000);
//! assert_eq!(priced.cash_sale_amount.cents(), 10000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod due;
pub mod error;
pub mod ledger;
pub mod money;
pub mod purchase;
pub mod sale;
pub mod seller;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use due::SellerDues;
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{InventoryTotals, ProductReport, StockStatus};
pub use money::Money;
pub use sale::{PricedSale, StockDelta};
pub use seller::{MonthlySummary, ProductSold, SellerSummary};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of product, seller and shop names.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum line items in one sale.
pub const MAX_SALE_LINES: usize = 100;

/// Largest quantity accepted for initial stock, an order, or a sale line.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest unit price accepted, in cents.
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;

/// Ceiling on a product's lifetime delivered quantity.
pub const MAX_DELIVERED_QUANTITY: i64 = 1_000_000_000_000;
