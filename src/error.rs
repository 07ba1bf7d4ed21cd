// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::auth::AuthError;
use crate::ledger::LedgerError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(_) => Self::not_found(err.to_string()),
            LedgerError::Conflict(_) => Self::conflict(err.to_string()),
            LedgerError::Unauthorized(_) => Self::unauthorized(err.to_string()),
            LedgerError::BusinessRule(_) => Self::unprocessable(err.to_string()),
            LedgerError::Storage(inner) => {
                error!(error = %inner, "storage failure");
                Self::internal("internal storage error")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidSignature(message) => Self::unauthorized(message),
            AuthError::Token(inner) => {
                error!(error = %inner, "token failure");
                Self::internal("token issuance failed")
            }
            AuthError::Rng => Self::internal("nonce generation failed"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let conflict = ApiError::conflict("taken");
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let unauthorized = ApiError::unauthorized("who");
        assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn ledger_errors_map_onto_the_taxonomy() {
        let nf: ApiError = LedgerError::NotFound("player".into()).into();
        assert_eq!(nf.status, StatusCode::NOT_FOUND);

        let conflict: ApiError =
            LedgerError::Conflict("publicAddress must be unique".into()).into();
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let rule: ApiError = LedgerError::BusinessRule("insufficient TOC balance".into()).into();
        assert_eq!(rule.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(rule.message, "insufficient TOC balance");
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        let err: ApiError =
            AuthError::InvalidSignature("Signature verification failed".into()).into();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Signature verification failed");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }
}
