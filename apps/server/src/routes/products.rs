//! Product Ledger endpoints. Products are returned as reports, with the
//! derived remaining quantity, values and stock status.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use stockbook_core::{InventoryTotals, NewProduct, ProductReport, ProductUpdate};
use tracing::info;

use crate::error::ApiResult;
use crate::response::Reply;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/summary", get(inventory_summary))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

async fn list_products(State(state): State<AppState>) -> ApiResult<Reply<Vec<ProductReport>>> {
    let reports = state.db.products().reports().await?;
    Ok(Reply::list(reports))
}

async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<Reply<ProductReport>> {
    let Json(input) = payload?;
    let product = state.db.products().create(&input).await?;
    info!(id = %product.id, name = %product.name, "Product created");
    Ok(Reply::created(product.report()))
}

async fn inventory_summary(State(state): State<AppState>) -> ApiResult<Reply<InventoryTotals>> {
    Ok(Reply::ok(state.db.products().inventory_totals().await?))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Reply<ProductReport>> {
    let product = state.db.products().get(&id).await?;
    Ok(Reply::ok(product.report()))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductUpdate>, JsonRejection>,
) -> ApiResult<Reply<ProductReport>> {
    let Json(update) = payload?;
    let product = state.db.products().update(&id, &update).await?;
    Ok(Reply::ok(product.report()))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Reply<Value>> {
    state.db.products().delete(&id).await?;
    info!(id = %id, "Product deleted");
    Ok(Reply::ok(json!({ "id": id })))
}
