use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::AppState;
use crate::handlers::middleware::CurrentOwner;
use crate::handlers::user::{map_account_error, require_login_fields};
use crate::models::account::{
    LoginRequest, OwnerLoginResponse, OwnerProfileResponse, OwnerRegisteredResponse,
    RegisterOwnerRequest,
};
use crate::models::error::{ApiError, bad_request, json_body, missing_fields};
use crate::services::accounts::{self, NewOwner};

/// POST /api/owner/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterOwnerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OwnerRegisteredResponse>), ApiError> {
    let request = json_body(payload)?;
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

    if let Some(msg) = missing_fields(&[
        ("username", present(&request.username)),
        ("email", present(&request.email)),
        ("password", present(&request.password)),
    ]) {
        return Err(bad_request(msg));
    }

    let owner = accounts::register_owner(
        &state.db,
        &state.config,
        NewOwner {
            username: request.username.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
        },
    )
    .await
    .map_err(map_account_error)?;

    Ok((
        StatusCode::CREATED,
        Json(OwnerRegisteredResponse {
            message: "Owner Registered Successfully".to_string(),
            owner,
        }),
    ))
}

/// POST /api/owner/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<OwnerLoginResponse>, ApiError> {
    let (email, password) = require_login_fields(json_body(payload)?)?;

    let (owner, token) = accounts::login_owner(&state.db, &state.config, &email, &password)
        .await
        .map_err(map_account_error)?;

    Ok(Json(OwnerLoginResponse {
        message: "Login Successful".to_string(),
        owner_data: owner,
        token,
    }))
}

/// GET /api/owner/profile
///
/// `totalBookings` counts bookings across every room the owner listed.
pub async fn profile(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
) -> Result<Json<OwnerProfileResponse>, ApiError> {
    let profile = accounts::owner_profile(&state.db, owner.id)
        .await
        .map_err(map_account_error)?;
    Ok(Json(profile.into()))
}
