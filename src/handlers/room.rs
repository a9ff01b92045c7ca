use axum::{
    Extension, Json,
    extract::{
        Multipart, Path, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::StatusCode,
};
use tracing::{error, warn};

use crate::AppState;
use crate::entities::rooms;
use crate::handlers::middleware::{CurrentOwner, CurrentUser};
use crate::models::error::{ApiError, api_error, bad_request, database_error, json_body};
use crate::models::purchase::{PurchaseRequest, PurchaseResponse, RoomSummary};
use crate::models::room::{MessageResponse, RoomForm, RoomResponse};
use crate::services::image_host::{ImageHostError, ImageUpload};
use crate::services::purchase::{self, PurchaseError, PurchaseInput};
use crate::services::rooms::{self as room_service, RoomError};

/// Map room management errors to HTTP responses
fn map_room_error(e: RoomError) -> ApiError {
    match e {
        RoomError::Invalid(msg) => bad_request(msg),
        RoomError::NotFound | RoomError::NotFoundOrNotOwned => {
            api_error(StatusCode::NOT_FOUND, e.to_string(), "ROOM_NOT_FOUND")
        }
        RoomError::NotOwned => api_error(StatusCode::FORBIDDEN, e.to_string(), "FORBIDDEN"),
        RoomError::Booked => api_error(StatusCode::CONFLICT, e.to_string(), "ROOM_BOOKED"),
        RoomError::Image(ImageHostError::Timeout(_)) => {
            warn!("Image host timed out");
            api_error(StatusCode::GATEWAY_TIMEOUT, e.to_string(), "IMAGE_HOST_TIMEOUT")
        }
        RoomError::Image(ref inner) => {
            error!(error = %inner, "Image host failure");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), "IMAGE_HOST_ERROR")
        }
        RoomError::Database(inner) => database_error(inner),
    }
}

/// Map purchase errors to HTTP responses
fn map_purchase_error(e: PurchaseError) -> ApiError {
    match e {
        PurchaseError::Invalid(msg) => bad_request(msg),
        PurchaseError::RoomNotFound => {
            api_error(StatusCode::NOT_FOUND, e.to_string(), "ROOM_NOT_FOUND")
        }
        PurchaseError::RoomUnavailable => {
            api_error(StatusCode::CONFLICT, e.to_string(), "ROOM_UNAVAILABLE")
        }
        PurchaseError::AlreadyPurchased => {
            api_error(StatusCode::CONFLICT, e.to_string(), "ALREADY_PURCHASED")
        }
        PurchaseError::Database(ref inner) => {
            error!(error = %inner, "Purchase failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error in Room Buying: {}", inner),
                "DATABASE_ERROR",
            )
        }
    }
}

async fn read_room_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<RoomForm, ApiError> {
    let mut multipart =
        multipart.map_err(|e| bad_request(format!("Invalid multipart body: {}", e.body_text())))?;
    let mut form = RoomForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart body: {}", e.body_text())))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("Failed to read image: {}", e.body_text())))?;

            if !bytes.is_empty() {
                form.image = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    file_name,
                    content_type,
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| bad_request(format!("Invalid field {}: {}", name, e.body_text())))?;
            form.set_text(&name, value);
        }
    }

    Ok(form)
}

/// POST /api/room/createRooms
///
/// Multipart form with every room field plus an `image` file (PNG/JPEG).
pub async fn create_room(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RoomResponse>, ApiError> {
    let (new_room, image) = read_room_form(multipart)
        .await?
        .into_new_room()
        .map_err(bad_request)?;

    let room = room_service::create_room(&state.db, state.images.as_ref(), owner.id, new_room, image)
        .await
        .map_err(map_room_error)?;

    Ok(Json(RoomResponse {
        message: "Room Created Successfully".to_string(),
        room,
    }))
}

/// PUT /api/room/updateRooms/{roomId}
///
/// Fields present in the form are updated. A new `image` replaces the old
/// one; without it the existing image is kept.
pub async fn update_room(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
    Path(room_id): Path<i32>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RoomResponse>, ApiError> {
    let (changes, image) = read_room_form(multipart)
        .await?
        .into_changes()
        .map_err(bad_request)?;

    let room = room_service::update_room(
        &state.db,
        state.images.as_ref(),
        owner.id,
        room_id,
        changes,
        image,
    )
    .await
    .map_err(map_room_error)?;

    Ok(Json(RoomResponse {
        message: "Room Details Updated Successfully".to_string(),
        room,
    }))
}

/// DELETE /api/room/deleteRooms/{roomId}
pub async fn delete_room(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
    Path(room_id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    room_service::delete_room(&state.db, state.images.as_ref(), owner.id, room_id)
        .await
        .map_err(map_room_error)?;

    Ok(Json(MessageResponse {
        message: "Room Deleted Successfully".to_string(),
    }))
}

/// GET /api/room/owner-rooms
pub async fn owner_rooms(
    State(state): State<AppState>,
    Extension(owner): Extension<CurrentOwner>,
) -> Result<Json<Vec<rooms::Model>>, ApiError> {
    let rooms = room_service::owner_rooms(&state.db, owner.id)
        .await
        .map_err(database_error)?;
    Ok(Json(rooms))
}

/// POST /api/room/getRooms
pub async fn get_rooms(
    State(state): State<AppState>,
) -> Result<Json<Vec<rooms::Model>>, ApiError> {
    let rooms = room_service::list_rooms(&state.db)
        .await
        .map_err(database_error)?;
    Ok(Json(rooms))
}

/// GET /api/room/getRoomsById/{roomId}
pub async fn get_room_by_id(
    State(state): State<AppState>,
    Path(room_id): Path<i32>,
) -> Result<Json<RoomResponse>, ApiError> {
    let room = room_service::find_room(&state.db, room_id)
        .await
        .map_err(map_room_error)?;

    Ok(Json(RoomResponse {
        message: "Room Found".to_string(),
        room,
    }))
}

/// GET /api/room/getLocations
pub async fn get_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let locations = room_service::list_locations(&state.db)
        .await
        .map_err(database_error)?;
    Ok(Json(locations))
}

/// POST /api/room/buy/{roomId}
///
/// Books the room for the caller. The body is optional; `amount` defaults
/// to the room price and `duration` to one month.
///
/// # Response
///
/// ```json
/// {
///   "message": "Room Purchased Successfully",
///   "purchase": { "id": 1, "userId": 7, "roomId": 3, "status": "Confirmed", ... },
///   "room": { "id": 3, "title": "Sunny room", "available": false }
/// }
/// ```
pub async fn buy_room(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(room_id): Path<i32>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PurchaseResponse>), ApiError> {
    let request = match payload {
        Err(JsonRejection::MissingJsonContentType(_)) => PurchaseRequest::default(),
        other => json_body(other)?,
    };

    let outcome = purchase::commit_purchase(
        &state.db,
        user.id,
        room_id,
        PurchaseInput {
            payment_id: request.payment_id,
            amount: request.amount,
            duration: request.duration,
        },
    )
    .await
    .map_err(|e| {
        if matches!(e, PurchaseError::RoomUnavailable | PurchaseError::AlreadyPurchased) {
            warn!(user_id = user.id, room_id, reason = %e, "Purchase rejected");
        }
        map_purchase_error(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            message: "Room Purchased Successfully".to_string(),
            room: RoomSummary::from(&outcome.room),
            purchase: outcome.booking,
        }),
    ))
}
