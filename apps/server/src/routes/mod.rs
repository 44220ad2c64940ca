//! # Routes
//!
//! Every handler lives under `/api` and answers with the JSON envelope
//! from [`crate::response`].
//!
//! ```text
//! /api/health                         health
//! /api/products[/summary|/{id}]       products
//! /api/orders/purchase[/{id}/deliver] purchase_orders
//! /api/orders/sales[/{id}]            sales
//! /api/orders/sellers[/{name}/...]    sellers
//! /api/dues[/sellers/{name}|/{id}]    dues
//! ```

use axum::Router;

use crate::state::AppState;

pub mod dues;
pub mod health;
pub mod products;
pub mod purchase_orders;
pub mod sales;
pub mod sellers;

/// Router for every API endpoint.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(purchase_orders::router())
        .merge(sales::router())
        .merge(sellers::router())
        .merge(dues::router())
}

/// Treats a blank query parameter as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
