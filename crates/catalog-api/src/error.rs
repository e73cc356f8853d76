use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog_pipeline::ExportError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Export(e) => {
                tracing::error!("Export failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
