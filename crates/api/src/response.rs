//! API response envelope.
//!
//! Every success response is `{success: true, data, ...}`; error responses
//! are produced by [`dishcovery_common::AppError`]'s `IntoResponse` and carry
//! `{success: false, error, code}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Row count for list endpoints that advertise one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// A 200 success response.
    pub const fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: None,
            count: None,
            data,
        }
    }

    /// A 201 success response for created resources.
    pub const fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            success: true,
            message: None,
            count: None,
            data,
        }
    }

    /// Attach a top-level `count` to the envelope.
    #[must_use]
    pub const fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Attach a human-readable message to the envelope.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
