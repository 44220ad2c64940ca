//! Seller Aggregator endpoints. Sellers exist only through their sales
//! records, so an unknown seller name answers 404.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use stockbook_core::{MonthlySummary, SellerSummary, YearMonth};

use crate::error::{ApiError, ApiResult};
use crate::response::Reply;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders/sellers", get(list_sellers))
        .route("/api/orders/sellers/{name}", get(seller_summary))
        .route("/api/orders/sellers/{name}/months/{month}", get(monthly_summary))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn list_sellers(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Reply<Vec<String>>> {
    let Query(query) = query?;
    let sellers = match query.q {
        Some(q) => state.db.sellers().search(&q).await?,
        None => state.db.sellers().list().await?,
    };
    Ok(Reply::list(sellers))
}

async fn seller_summary(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Reply<SellerSummary>> {
    let summary = state.db.sellers().summary(&name).await?;
    if summary.is_empty() {
        return Err(ApiError::not_found("Seller", &name));
    }
    Ok(Reply::ok(summary))
}

async fn monthly_summary(
    State(state): State<AppState>,
    Path((name, month)): Path<(String, String)>,
) -> ApiResult<Reply<MonthlySummary>> {
    let month: YearMonth = month.parse()?;
    Ok(Reply::ok(state.db.sellers().monthly(&name, month).await?))
}
