//! The single error contract for every endpoint: a non-2xx status with `{"error": "..."}`.

use api_shared::ErrorRes;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hai_core::{CoreError, InferenceError};

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn inference_status(err: &InferenceError) -> StatusCode {
    match err {
        InferenceError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        InferenceError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        InferenceError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        InferenceError::Unauthorized(_)
        | InferenceError::Upstream { .. }
        | InferenceError::Transport(_)
        | InferenceError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let status = match &err {
            CoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CoreError::InvalidUpload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CoreError::Inference(inner) => inference_status(inner),
        };

        if let CoreError::Inference(InferenceError::Upstream { status, body }) = &err {
            tracing::error!("upstream returned {}: {}", status, body);
        }

        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("request failed ({}): {}", self.status, self.message);
        } else {
            tracing::warn!("request rejected ({}): {}", self.status, self.message);
        }

        (self.status, Json(ErrorRes::new(self.message))).into_response()
    }
}
