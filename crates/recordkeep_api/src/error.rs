//! HTTP error mapping.
//!
//! Every failure is answered with `{ "success": false }`; the status code is
//! the only machine-readable signal.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error};
use recordkeep_core::{RecordId, ServiceError};
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    /// Client input could not be parsed or validated. 400.
    BadRequest(String),
    /// No record with this id. 404.
    NotFound(RecordId),
    /// Storage or connectivity failure. 500.
    Store(String),
    /// Runtime failure outside the store. 500.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "store_failed",
            Self::Internal(_) => "internal",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Store(message) => write!(f, "store failure: {message}"),
            Self::Internal(message) => write!(f, "internal failure: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Validation(err) => Self::BadRequest(err.to_string()),
            ServiceError::NotFound(id) => Self::NotFound(id),
            ServiceError::Repo(err) => Self::Store(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=api_error module=api status=error error_code={} error={}",
                self.code(),
                self
            );
        } else {
            debug!(
                "event=api_error module=api status=rejected error_code={} error={}",
                self.code(),
                self
            );
        }

        (status, Json(json!({ "success": false }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use recordkeep_core::{RecordValidationError, RepoError, ServiceError};
    use uuid::Uuid;

    #[test]
    fn service_errors_map_to_distinct_statuses() {
        let validation: ApiError =
            ServiceError::Validation(RecordValidationError::MissingTitle).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let missing: ApiError = ServiceError::NotFound(Uuid::new_v4()).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let store: ApiError =
            ServiceError::Repo(RepoError::InvalidData("bad row".to_string())).into();
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
