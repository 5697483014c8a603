use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::api::envelope::Envelope;
use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed validation: {0:?}")]
    Validation(BTreeMap<String, String>),

    #[error("Not found")]
    NotFound,

    #[error("Edit conflict")]
    EditConflict,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound,
            StoreError::EditConflict => AppError::EditConflict,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Value::from(serde_json::Map::from_iter(
                    errors.into_iter().map(|(k, v)| (k, Value::String(v))),
                )),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "the requested resource could not be found".into(),
            ),
            AppError::EditConflict => {
                warn!("edit conflict");
                (
                    StatusCode::CONFLICT,
                    "unable to update the record due to an edit conflict, please try again".into(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Value::String(msg)),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "the method is not supported for this resource".into(),
            ),
            AppError::Internal(msg) => {
                error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "the server encountered a problem and could not process your request".into(),
                )
            }
        };

        Envelope::new(status, "error", body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::NotFound, StatusCode::NOT_FOUND),
            (StoreError::EditConflict, StatusCode::CONFLICT),
            (
                StoreError::Timeout(std::time::Duration::from_secs(3)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                StoreError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn validation_is_a_bad_request() {
        let errors = BTreeMap::from([("code".to_string(), "must be provided".to_string())]);
        let resp = AppError::Validation(errors).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
