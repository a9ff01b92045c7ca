//! Bearer-token guards for the user, owner and admin route groups
//!
//! Each guard decodes the token with its role's secret and inserts the
//! caller identity into the request extensions for downstream handlers.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::AppState;
use crate::models::error::{ApiError, api_error};
use crate::services::auth::{AuthError, Claims, Role, decode_token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentOwner {
    pub id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentAdmin {
    pub id: i32,
}

fn unauthorized(message: &str) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, message, "UNAUTHORIZED")
}

/// Extracts the token from `Authorization: Bearer <token>` and validates it
/// for `role`.
fn authenticate(req: &Request, secret: &str, role: Role) -> Result<Claims, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Authentication required. Please login."))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.split_whitespace().nth(1))
        .ok_or_else(|| unauthorized("Authentication token missing. Please login again."))?;

    decode_token(token, secret, role).map_err(|e| {
        debug!(%role, error = %e, "Token rejected");
        match e {
            AuthError::Expired => unauthorized("Token expired. Please login again."),
            _ => unauthorized("Invalid authentication token. Please login again."),
        }
    })
}

pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&req, &state.config.jwt.user, Role::User)?;
    req.extensions_mut().insert(CurrentUser { id: claims.id });
    Ok(next.run(req).await)
}

pub async fn require_owner(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&req, &state.config.jwt.owner, Role::Owner)?;
    req.extensions_mut().insert(CurrentOwner { id: claims.id });
    Ok(next.run(req).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(&req, &state.config.jwt.admin, Role::Admin)?;
    req.extensions_mut().insert(CurrentAdmin { id: claims.id });
    Ok(next.run(req).await)
}
