use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::error::TaskError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Validation(_) => Self::bad_request(err.to_string()),
            TaskError::NotFound(_) => {
                Self { status: StatusCode::NOT_FOUND, message: err.to_string() }
            }
            TaskError::Backend(source) => {
                tracing::error!(error = ?source, "backend failure");
                let message = "internal server error".into();
                Self { status: StatusCode::INTERNAL_SERVER_ERROR, message }
            }
        }
    }
}

/// Every body decoding failure is the client's fault, whatever axum would pick.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self::bad_request(rejection.body_text()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, axum::Json(self)).into_response() }
}
