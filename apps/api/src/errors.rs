use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::pipeline::PipelineError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every error renders as `{"detail": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    /// Provider text is passed through verbatim, unredacted.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(msg) => {
                tracing::debug!("Rejected request: {msg}");
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Pipeline(e) => {
                tracing::error!("Analysis failed at step {} ({}): {e}", e.index + 1, e.step);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "detail": self.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    use crate::llm_client::ProviderError;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_pipeline_error_is_500_with_verbatim_detail() {
        let error = AppError::from(PipelineError {
            step: "competitor_list",
            index: 0,
            source: ProviderError::Api {
                status: 401,
                message: "Incorrect API key provided".to_string(),
            },
        });

        let (status, body) = render(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "detail": "OpenAI API error: status 401: Incorrect API key provided" })
        );
    }

    #[tokio::test]
    async fn test_validation_error_is_422() {
        let (status, body) = render(AppError::Validation("company_name cannot be empty".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "company_name cannot be empty");
    }
}
