//! # stockbook-db: Database Layer for Stockbook
//!
//! SQLite persistence for products, purchase orders, sales records and
//! due entries, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /api/orders/sales)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  stockbook-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ PurchaseOrder │    │ 001_initial  │  │   │
//! │  │   │               │    │ SaleRepo      │    │  _schema.sql │  │   │
//! │  │   │               │    │ DueRepo       │    │              │  │   │
//! │  │   │               │    │ SellerRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (stockbook.db)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockbook_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockbook.db")).await?;
//! let record = db.sales().create(&new_sale).await?;
//! let dues = db.dues().seller_dues("Acme").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::due::DueRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase_order::PurchaseOrderRepository;
pub use repository::sale::SaleRepository;
pub use repository::seller::SellerRepository;
