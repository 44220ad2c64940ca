//! # Repository Module
//!
//! Database repository implementations for Stockbook.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().create(&input)                                     │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── validates and prices via stockbook-core                           │
//! │  ├── writes record + items + counters in one transaction               │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Products and stock counters
//! - [`PurchaseOrderRepository`](purchase_order::PurchaseOrderRepository) - Orders and delivery
//! - [`SaleRepository`](sale::SaleRepository) - Sales records and items
//! - [`DueRepository`](due::DueRepository) - Due entries and settlement
//! - [`SellerRepository`](seller::SellerRepository) - Read-only seller summaries

pub mod due;
pub mod product;
pub mod purchase_order;
pub mod sale;
pub mod seller;
