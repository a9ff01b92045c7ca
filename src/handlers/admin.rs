//! Admin console: login and read-only listings

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use sea_orm::{EntityTrait, QueryOrder};

use crate::AppState;
use crate::entities::prelude::*;
use crate::entities::{owners, rooms, users};
use crate::handlers::user::{map_account_error, require_login_fields};
use crate::models::account::{AdminLoginResponse, LoginRequest};
use crate::models::admin::{
    BookingInfoResponse, BookingsListResponse, OwnerInfoResponse, OwnersListResponse,
    RoomInfoResponse, RoomsListResponse, UserInfoResponse, UsersListResponse,
};
use crate::models::error::{ApiError, database_error, json_body, not_found};
use crate::services::{accounts, admin};

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let (email, password) = require_login_fields(json_body(payload)?)?;

    let (admin, token) = accounts::login_admin(&state.db, &state.config, &email, &password)
        .await
        .map_err(map_account_error)?;

    Ok(Json(AdminLoginResponse {
        message: "Login Successful".to_string(),
        admin_data: admin,
        token,
    }))
}

/// GET /api/admin/booking
///
/// Every booking joined with its user, room, owner and payment.
pub async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<BookingsListResponse>, ApiError> {
    let bookings = admin::list_booking_details(&state.db)
        .await
        .map_err(database_error)?;

    Ok(Json(BookingsListResponse {
        message: "Bookings fetched".to_string(),
        total_bookings: bookings.len(),
        bookings,
    }))
}

pub async fn booking_info(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<BookingInfoResponse>, ApiError> {
    let booking = admin::find_booking_details(&state.db, id)
        .await
        .map_err(database_error)?
        .ok_or_else(|| not_found("Booking Not Found"))?;

    Ok(Json(BookingInfoResponse {
        message: "Booking Found".to_string(),
        booking,
    }))
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<UsersListResponse>, ApiError> {
    let users = Users::find()
        .order_by_asc(users::Column::Id)
        .all(&state.db)
        .await
        .map_err(database_error)?;

    Ok(Json(UsersListResponse {
        message: "Users fetched".to_string(),
        users,
    }))
}

pub async fn user_info(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserInfoResponse>, ApiError> {
    let user = Users::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(database_error)?
        .ok_or_else(|| not_found("User Not Found"))?;

    Ok(Json(UserInfoResponse {
        message: "User Found".to_string(),
        user,
    }))
}

pub async fn list_rooms(
    State(state): State<AppState>,
) -> Result<Json<RoomsListResponse>, ApiError> {
    let rooms = Rooms::find()
        .order_by_asc(rooms::Column::Id)
        .all(&state.db)
        .await
        .map_err(database_error)?;

    Ok(Json(RoomsListResponse {
        message: "Rooms fetched".to_string(),
        rooms,
    }))
}

pub async fn room_info(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RoomInfoResponse>, ApiError> {
    let room = Rooms::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(database_error)?
        .ok_or_else(|| not_found("Room Not Found"))?;

    Ok(Json(RoomInfoResponse {
        message: "Room Found".to_string(),
        room,
    }))
}

pub async fn list_owners(
    State(state): State<AppState>,
) -> Result<Json<OwnersListResponse>, ApiError> {
    let owners = Owners::find()
        .order_by_asc(owners::Column::Id)
        .all(&state.db)
        .await
        .map_err(database_error)?;

    Ok(Json(OwnersListResponse {
        message: "Owners fetched".to_string(),
        owners,
    }))
}

pub async fn owner_info(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OwnerInfoResponse>, ApiError> {
    let owner = Owners::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(database_error)?
        .ok_or_else(|| not_found("Owner Not Found"))?;

    Ok(Json(OwnerInfoResponse {
        message: "Owner Found".to_string(),
        owner,
    }))
}
