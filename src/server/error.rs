use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::core::error::CheckError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

#[derive(Debug)]
pub enum ApiError {
    Validation { message: String },
    MethodNotAllowed,
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<CheckError> for ApiError {
    fn from(err: CheckError) -> Self {
        if err.is_validation() {
            return ApiError::bad_request(err.to_string());
        }
        tracing::error!("batch check failed: {err}");
        ApiError::internal("Failed to check handles")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Validation { message } => {
                (StatusCode::BAD_REQUEST, "validation_error", message)
            }
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                "Method not allowed - POST only".to_string(),
            ),
            ApiError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };

        (status, Json(ErrorBody { error: message, code })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn batch_failures_become_generic_500() {
        for err in [
            CheckError::Internal("probe task failed: panicked".into()),
            CheckError::Network("connection reset".into()),
            CheckError::Unknown,
        ] {
            let (status, body) = render(ApiError::from(err)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["code"], "internal_error");
            assert_eq!(body["error"], "Failed to check handles");
            assert!(body.get("results").is_none());
        }
    }

    #[tokio::test]
    async fn input_errors_become_400() {
        let (status, body) =
            render(ApiError::from(CheckError::UnknownPlatform("myspace".into()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_error");
        assert!(body["error"].as_str().unwrap().contains("myspace"));

        let (status, _) =
            render(ApiError::from(CheckError::Validation("names must be a non-empty list".into())))
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn method_not_allowed_body() {
        let (status, body) = render(ApiError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed - POST only");
        assert_eq!(body["code"], "method_not_allowed");
    }
}
