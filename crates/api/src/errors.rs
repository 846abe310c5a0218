//! Error kind → transport status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use sentra_auth::AuthError;
use sentra_policy::PolicyError;

use crate::directory::DirectoryError;

/// JSON error body shared by all endpoints.
pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": code, "message": message.into() })),
    )
        .into_response()
}

/// API-level error; every variant knows its status code.
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    Policy(PolicyError),
    /// Bad or missing credentials — deliberately detail-free.
    Unauthorized,
    /// Authenticated but not allowed.
    Forbidden,
    NotFound(String),
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}

impl From<PolicyError> for ApiError {
    fn from(e: PolicyError) -> Self {
        Self::Policy(e)
    }
}

impl From<DirectoryError> for ApiError {
    fn from(e: DirectoryError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(e) => match e {
                AuthError::MalformedToken
                | AuthError::MalformedPayload
                | AuthError::BadSignature
                | AuthError::Expired
                | AuthError::Revoked => StatusCode::UNAUTHORIZED,
                AuthError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Policy(e) => match e {
                PolicyError::Validation(_) => StatusCode::BAD_REQUEST,
                PolicyError::AlreadyExists(_) => StatusCode::CONFLICT,
                PolicyError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Auth(AuthError::Expired) => "token_expired",
            Self::Auth(AuthError::Revoked) => "token_revoked",
            Self::Auth(AuthError::StoreUnavailable(_)) => "store_unavailable",
            Self::Auth(_) => "invalid_token",
            Self::Policy(PolicyError::Validation(_)) => "validation",
            Self::Policy(PolicyError::AlreadyExists(_)) => "already_exists",
            Self::Policy(_) => "policy_storage",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Auth(e) => e.to_string(),
            Self::Policy(e) => e.to_string(),
            Self::Unauthorized => "invalid credentials".to_string(),
            Self::Forbidden => "insufficient permissions".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            // Internal details stay in the logs, not the response.
            Self::Internal(_) => "internal error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(detail = %detail, "internal error");
        }
        json_error(self.status(), self.code(), self.message())
    }
}
