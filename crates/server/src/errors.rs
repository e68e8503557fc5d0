use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// Client-facing error: an HTTP status plus a `{"message": ...}` JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::StorageRead(msg) => {
                error!(error = %msg, "storage read failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Error reading data file")
            }
            ServiceError::StorageWrite(msg) => {
                error!(error = %msg, "storage write failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Error writing data file")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"message": self.message}))).into_response()
    }
}
