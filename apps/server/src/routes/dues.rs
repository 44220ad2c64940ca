//! Due Ledger endpoints.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use stockbook_core::{DueEntry, NewDue, SellerDues};

use crate::error::ApiResult;
use crate::response::Reply;
use crate::routes::non_blank;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/dues", get(list_dues).post(create_due))
        .route("/api/dues/sellers/{name}", get(seller_dues))
        .route("/api/dues/{id}", delete(settle_due))
}

#[derive(Debug, Deserialize)]
struct ListDuesQuery {
    seller: Option<String>,
}

async fn list_dues(
    State(state): State<AppState>,
    query: Result<Query<ListDuesQuery>, QueryRejection>,
) -> ApiResult<Reply<Vec<DueEntry>>> {
    let Query(query) = query?;
    let seller = non_blank(query.seller);
    Ok(Reply::list(state.db.dues().list(seller.as_deref()).await?))
}

async fn create_due(
    State(state): State<AppState>,
    payload: Result<Json<NewDue>, JsonRejection>,
) -> ApiResult<Reply<DueEntry>> {
    let Json(input) = payload?;
    Ok(Reply::created(state.db.dues().create(&input).await?))
}

async fn seller_dues(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Reply<SellerDues>> {
    Ok(Reply::ok(state.db.dues().seller_dues(&name).await?))
}

async fn settle_due(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Reply<Value>> {
    state.db.dues().settle(&id).await?;
    Ok(Reply::ok(json!({ "id": id })))
}
