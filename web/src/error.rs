//! # HTTP Errors
//!
//! Maps [`AppError`] onto the JSON error bodies returned by the proxy.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use autodoc_core::AppError;
use derive_more::{Display, From};
use log::error;
use serde_json::json;

/// Handler error: an [`AppError`] rendered as JSON.
///
/// Missing input is a 400 with a descriptive message. Everything else is a
/// 500 carrying the category message and the underlying error text.
#[derive(Debug, Display, From)]
#[display("{_0}")]
pub struct ApiError(pub AppError);

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = if self.0.is_client_error() {
            json!({ "status": "error", "message": self.0.to_string() })
        } else {
            error!("request failed: {}", self.0);
            json!({
                "status": "error",
                "message": self.0.category().message(),
                "error": self.0.to_string(),
            })
        };
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: ApiError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_missing_parameter_is_400() {
        let err = ApiError(AppError::MissingParameter("endpoint".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(err).await,
            json!({
                "status": "error",
                "message": "Missing required query parameter: endpoint"
            })
        );
    }

    #[actix_web::test]
    async fn test_database_error_body() {
        let err = ApiError(AppError::Database("relation does not exist".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(err).await;
        assert_eq!(body["message"], "Database operation failed");
        assert_eq!(body["error"], "Database Error: relation does not exist");
    }

    #[actix_web::test]
    async fn test_processing_error_body() {
        let body = body_of(ApiError(AppError::Upstream("connection refused".into()))).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Documentation operation failed");
    }
}
