//! Private-tier role/permission CRUD.
//!
//! All mutations target the resource scope; the application-wide scope only
//! answers the admission check.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use sentra_auth::Claims;
use sentra_policy::{Permission, PolicyTuple};

use crate::app::AppState;
use crate::errors::ApiError;
use crate::middleware::extract_bearer;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route(
            "/:role",
            get(get_role).put(update_role).delete(delete_role),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// A single role with its permission tuples — deliberately a different
/// response shape from the role list.
#[derive(Debug, Serialize)]
pub struct RoleDetail {
    pub role: String,
    pub permissions: Vec<Permission>,
}

impl RoleDetail {
    fn new(role: String, tuples: Vec<PolicyTuple>) -> Self {
        Self {
            role,
            permissions: tuples.into_iter().map(Permission::from).collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Admission
// ─────────────────────────────────────────────────────────────────────────────

/// Validate the bearer token and check role-management permission against
/// the application-wide scope. Private tier: store outages fail closed.
fn require_role_manager(state: &AppState, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let token = extract_bearer(headers)?;
    let claims = state.lifecycle.validate(token)?;

    if !state
        .policy
        .app
        .allows(claims.role.as_str(), "roles", "manage")?
    {
        return Err(ApiError::Forbidden);
    }
    Ok(claims)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_roles(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    require_role_manager(&state, &headers)?;
    let roles = state.policy.resource.list_roles()?;
    Ok(Json(serde_json::json!({ "roles": roles })))
}

pub async fn get_role(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(role): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_role_manager(&state, &headers)?;

    let perms = state.policy.resource.get_permissions(&role)?;
    if perms.is_empty() {
        return Err(ApiError::NotFound(format!("role '{role}'")));
    }
    Ok(Json(RoleDetail::new(role, perms)))
}

pub async fn create_role(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = require_role_manager(&state, &headers)?;

    state.policy.resource.create_role(&req.role, req.permissions)?;
    tracing::info!(role = %req.role, by = %claims.email, "role created");
    Ok(StatusCode::CREATED)
}

pub async fn update_role(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(role): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = require_role_manager(&state, &headers)?;

    state.policy.resource.update_role(&role, req.permissions)?;
    tracing::info!(role = %role, by = %claims.email, "role replaced");

    let perms = state.policy.resource.get_permissions(&role)?;
    Ok(Json(RoleDetail::new(role, perms)))
}

pub async fn delete_role(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Path(role): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = require_role_manager(&state, &headers)?;

    state.policy.resource.delete_role(&role)?;
    tracing::info!(role = %role, by = %claims.email, "role deleted");
    Ok(StatusCode::NO_CONTENT)
}
