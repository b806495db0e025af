use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use crate::{auth::AuthError, domain::StoreError};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Non-Slack error responses. Slack-facing failures are rendered as
/// messages instead, so this is only hit for bad tokens, bad payloads and
/// broken OAuth round trips.
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

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Store error: {:?}", err);
        Self::internal(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Slack(_) => Self::bad_request(err.to_string()),
            _ => {
                tracing::error!("OAuth error: {:?}", err);
                Self::new(StatusCode::BAD_GATEWAY, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_are_internal() {
        let err = ApiError::from(StoreError::Unavailable("down".into()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rejected_slack_code_is_a_bad_request() {
        let err = ApiError::from(AuthError::Slack("invalid_code".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
