use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::errors::UseCaseError;
use crate::domain::authorization::AuthorizationError;
use crate::domain::errors::DomainError;

/// API error response, rendered as `{ "message": ... }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    retry_after: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden")
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn too_many_requests(message: impl Into<String>, retry_after_secs: u64) -> Self {
        Self {
            retry_after: Some(retry_after_secs),
            ..Self::new(StatusCode::TOO_MANY_REQUESTS, message)
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": self.message,
        }));

        let mut response = (self.status, body).into_response();
        if let Some(secs) = self.retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<UseCaseError> for ApiError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::Validation(msg) => ApiError::bad_request(msg),
            UseCaseError::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, msg),
            UseCaseError::NotFound(msg) => ApiError::new(StatusCode::NOT_FOUND, msg),
            UseCaseError::UnsupportedMedia(msg) => {
                ApiError::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, msg)
            }
            UseCaseError::Unauthorized(msg) => ApiError::new(StatusCode::UNAUTHORIZED, msg),
            UseCaseError::Forbidden(msg) => ApiError::new(StatusCode::FORBIDDEN, msg),
            internal => {
                error!(error = %internal, "Request failed");
                ApiError::internal_error(internal.to_string())
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        UseCaseError::from(err).into()
    }
}

impl From<AuthorizationError> for ApiError {
    fn from(err: AuthorizationError) -> Self {
        UseCaseError::from(err).into()
    }
}
