//! Success envelope: `{"success": true, "data": ..., "count"?: n}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// A successful response with its status code.
#[derive(Debug)]
pub struct Reply<T> {
    status: StatusCode,
    body: ApiResponse<T>,
}

impl<T: Serialize> Reply<T> {
    /// 200 with a single item.
    pub fn ok(data: T) -> Self {
        Reply {
            status: StatusCode::OK,
            body: ApiResponse {
                success: true,
                data,
                count: None,
            },
        }
    }

    /// 201 for a newly created item.
    pub fn created(data: T) -> Self {
        Reply {
            status: StatusCode::CREATED,
            ..Reply::ok(data)
        }
    }
}

impl<T: Serialize> Reply<Vec<T>> {
    /// 200 with a collection and its length.
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Reply {
            status: StatusCode::OK,
            body: ApiResponse {
                success: true,
                data,
                count: Some(count),
            },
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
