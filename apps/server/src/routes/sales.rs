//! Sales record endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use stockbook_core::{NewSale, SalesRecord};

use crate::error::ApiResult;
use crate::response::Reply;
use crate::routes::non_blank;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders/sales", get(list_sales).post(create_sale))
        .route("/api/orders/sales/{id}", get(get_sale))
}

#[derive(Debug, Deserialize)]
struct ListSalesQuery {
    seller: Option<String>,
}

async fn list_sales(
    State(state): State<AppState>,
    query: Result<Query<ListSalesQuery>, QueryRejection>,
) -> ApiResult<Reply<Vec<SalesRecord>>> {
    let Query(query) = query?;
    let seller = non_blank(query.seller);
    let records = state.db.sales().list(seller.as_deref()).await?;
    Ok(Reply::list(records))
}

async fn create_sale(
    State(state): State<AppState>,
    payload: Result<Json<NewSale>, JsonRejection>,
) -> ApiResult<Reply<SalesRecord>> {
    let Json(input) = payload?;
    let record = state.db.sales().create(&input).await?;
    Ok(Reply::created(record))
}

async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Reply<SalesRecord>> {
    Ok(Reply::ok(state.db.sales().get(&id).await?))
}
