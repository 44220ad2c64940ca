//! Purchase order endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use stockbook_core::{NewPurchaseOrder, PurchaseOrder, PurchaseOrderStatus};

use crate::error::ApiResult;
use crate::response::Reply;
use crate::routes::non_blank;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders/purchase", get(list_orders).post(create_order))
        .route("/api/orders/purchase/{id}", get(get_order))
        .route("/api/orders/purchase/{id}/deliver", put(deliver_order))
}

#[derive(Debug, Deserialize)]
struct ListOrdersQuery {
    status: Option<String>,
}

async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<ListOrdersQuery>, QueryRejection>,
) -> ApiResult<Reply<Vec<PurchaseOrder>>> {
    let Query(query) = query?;
    let status = non_blank(query.status)
        .map(|s| s.parse::<PurchaseOrderStatus>())
        .transpose()?;

    let orders = state.db.purchase_orders().list(status).await?;
    Ok(Reply::list(orders))
}

async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<NewPurchaseOrder>, JsonRejection>,
) -> ApiResult<Reply<PurchaseOrder>> {
    let Json(input) = payload?;
    let order = state.db.purchase_orders().create(&input).await?;
    Ok(Reply::created(order))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Reply<PurchaseOrder>> {
    Ok(Reply::ok(state.db.purchase_orders().get(&id).await?))
}

async fn deliver_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Reply<PurchaseOrder>> {
    Ok(Reply::ok(state.db.purchase_orders().mark_delivered(&id).await?))
}
