use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::error;

use crate::AppState;
use crate::handlers::middleware::CurrentUser;
use crate::models::account::{
    LoginRequest, RegisterUserRequest, UserLoginResponse, UserProfileResponse,
    UserRegisteredResponse,
};
use crate::models::error::{
    ApiError, api_error, bad_request, database_error, json_body, missing_fields,
};
use crate::models::purchase::BookedResponse;
use crate::services::accounts::{self, AccountError, NewUser};
use crate::services::purchase::list_user_bookings;

/// Shared by the user, owner and admin auth handlers
pub(crate) fn map_account_error(e: AccountError) -> ApiError {
    match e {
        AccountError::Invalid(msg) => bad_request(msg),
        AccountError::EmailTaken(_) => {
            api_error(StatusCode::BAD_REQUEST, e.to_string(), "ACCOUNT_EXISTS")
        }
        AccountError::NotFound(_) => api_error(StatusCode::NOT_FOUND, e.to_string(), "NOT_FOUND"),
        AccountError::WrongPassword => {
            api_error(StatusCode::UNAUTHORIZED, e.to_string(), "INVALID_PASSWORD")
        }
        AccountError::InvalidCredentials => {
            api_error(StatusCode::BAD_REQUEST, e.to_string(), "INVALID_CREDENTIALS")
        }
        AccountError::Auth(ref inner) => {
            error!(error = %inner, "Credential processing failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), "AUTH_ERROR")
        }
        AccountError::Database(inner) => database_error(inner),
    }
}

pub(crate) fn require_login_fields(request: LoginRequest) -> Result<(String, String), ApiError> {
    if let Some(msg) = missing_fields(&[
        ("email", request.email.as_deref().is_some_and(|s| !s.trim().is_empty())),
        ("password", request.password.as_deref().is_some_and(|s| !s.is_empty())),
    ]) {
        return Err(bad_request(msg));
    }
    Ok((
        request.email.unwrap_or_default(),
        request.password.unwrap_or_default(),
    ))
}

/// POST /api/user/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserRegisteredResponse>), ApiError> {
    let request = json_body(payload)?;

    let mobile_no = request.mobile_no.map(|m| m.into_string());
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

    if let Some(msg) = missing_fields(&[
        ("name", present(&request.name)),
        ("email", present(&request.email)),
        ("password", present(&request.password)),
        ("mobile_no", present(&mobile_no)),
    ]) {
        return Err(bad_request(msg));
    }

    let user = accounts::register_user(
        &state.db,
        &state.config,
        NewUser {
            name: request.name.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
            mobile_no: mobile_no.unwrap_or_default(),
            role: request.role,
        },
    )
    .await
    .map_err(map_account_error)?;

    Ok((
        StatusCode::CREATED,
        Json(UserRegisteredResponse {
            message: "User Registered Successfully".to_string(),
            user,
        }),
    ))
}

/// POST /api/user/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserLoginResponse>, ApiError> {
    let (email, password) = require_login_fields(json_body(payload)?)?;

    let (user, token) = accounts::login_user(&state.db, &state.config, &email, &password)
        .await
        .map_err(map_account_error)?;

    Ok(Json(UserLoginResponse {
        message: "Login Successful".to_string(),
        user_data: user,
        token,
    }))
}

/// GET /api/user/booked
///
/// The caller's bookings and the rooms they reference. Empty arrays when the
/// caller has booked nothing.
pub async fn booked(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<BookedResponse>, ApiError> {
    let (booked, rooms_data) = list_user_bookings(&state.db, user.id)
        .await
        .map_err(database_error)?;

    let message = if booked.is_empty() {
        "No bookings found"
    } else {
        "Bookings found"
    };

    Ok(Json(BookedResponse {
        message: message.to_string(),
        booked,
        rooms_data,
    }))
}

/// GET /api/user/profile
pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let profile = accounts::user_profile(&state.db, user.id)
        .await
        .map_err(map_account_error)?;
    Ok(Json(profile.into()))
}
