use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::GRADER_STATUS_HEADER;
use crate::grading::GradingError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<GradingError> for GatewayError {
    fn from(err: GradingError) -> Self {
        match err {
            GradingError::NotFound { .. } => GatewayError::NotFound(err.to_string()),
            GradingError::SurveyMismatch { .. } | GradingError::NoAnswers { .. } => {
                GatewayError::InvalidRequest(err.to_string())
            }
            GradingError::Store(_) => GatewayError::InternalError(err.to_string()),
        }
    }
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        GradingError::from(err).into()
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, grader_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            GatewayError::InternalError(_) => {
                tracing::error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(GRADER_STATUS_HEADER, HeaderValue::from_static(grader_status));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
