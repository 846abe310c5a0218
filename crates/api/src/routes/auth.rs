//! Public and internal-tier token endpoints.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use sentra_auth::{verify_password, Claims, OutagePolicy, TokenPair};
use sentra_core::{Role, Subject};

use crate::app::AppState;
use crate::errors::ApiError;
use crate::middleware::extract_bearer;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", delete(logout))
        .route("/validate", get(validate))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub user_id: i64,
    pub user_uuid: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: UserSummary,
}

impl UserSummary {
    fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id,
            user_uuid: claims.user_uuid.clone(),
            email: claims.email.clone(),
            display_name: claims.display_name.clone(),
            role: claims.role.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /auth/login — public tier.
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state
        .directory
        .find_by_email(&req.email)?
        .ok_or(ApiError::Unauthorized)?;

    verify_password(&record.password_hash, &req.password).map_err(|_| ApiError::Unauthorized)?;

    // Role is resolved once, at issuance, and is immutable for the token's
    // lifetime.
    let role = if state.config.is_admin_email(&record.email) {
        Role::new("admin")
    } else {
        Role::new("user")
    };

    let subject = Subject::new(
        record.user_id,
        record.user_uuid,
        record.email,
        record.display_name,
    )
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    let tokens = state.lifecycle.issue_pair(&subject, role.clone())?;

    tracing::info!(user_id = subject.user_id, "login");

    Ok(Json(LoginResponse {
        tokens,
        user: UserSummary {
            user_id: subject.user_id,
            user_uuid: subject.user_uuid,
            email: subject.email,
            display_name: subject.display_name,
            role: role.to_string(),
        },
    }))
}

/// POST /auth/refresh — public tier.
///
/// The refresh token carries the same subject/role as the access token it
/// was paired with, so a fresh pair is minted without re-authenticating.
pub async fn refresh(
    Extension(state): Extension<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state.lifecycle.validate(&req.refresh_token)?;
    let tokens = state
        .lifecycle
        .issue_pair(&claims.subject(), claims.role.clone())?;
    Ok(Json(tokens))
}

/// DELETE /auth/logout — internal tier. Credential-mutating: denylist
/// outages fail closed.
pub async fn logout(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = extract_bearer(&headers)?;
    state.lifecycle.invalidate(token)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/validate — internal tier, read-only: a denylist outage
/// degrades fail-open rather than taking the endpoint down.
pub async fn validate(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = extract_bearer(&headers)?;
    let claims = state
        .lifecycle
        .validate_with_policy(token, OutagePolicy::FailOpen)?;
    Ok(Json(UserSummary::from_claims(&claims)))
}
