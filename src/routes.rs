//! HTTP route table

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::AppState;
use crate::handlers::{admin, middleware, owner, payment, room, user};

/// Room images are uploaded through the API
const ROOM_UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/booked", get(user::booked))
        .route("/profile", get(user::profile))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_user))
        .route("/register", post(user::register))
        .route("/login", post(user::login))
}

fn owner_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/profile", get(owner::profile))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_owner))
        .route("/register", post(owner::register))
        .route("/login", post(owner::login))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/booking", get(admin::list_bookings))
        .route("/booking/{id}", get(admin::booking_info))
        .route("/user", get(admin::list_users))
        .route("/user/{id}", get(admin::user_info))
        .route("/room", get(admin::list_rooms))
        .route("/room/{id}", get(admin::room_info))
        .route("/owner", get(admin::list_owners))
        .route("/owner/{id}", get(admin::owner_info))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_admin))
        .route("/login", post(admin::login))
}

fn room_routes(state: &AppState) -> Router<AppState> {
    let owner_only = Router::new()
        .route("/createRooms", post(room::create_room))
        .route("/updateRooms/{roomId}", put(room::update_room))
        .route("/deleteRooms/{roomId}", delete(room::delete_room))
        .route("/owner-rooms", get(room::owner_rooms))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_owner))
        .layer(DefaultBodyLimit::max(ROOM_UPLOAD_LIMIT_BYTES));

    let user_only = Router::new()
        .route("/buy/{roomId}", post(room::buy_room))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_user));

    Router::new()
        .route("/getRooms", post(room::get_rooms))
        .route("/getRoomsById/{roomId}", get(room::get_room_by_id))
        .route("/getLocations", get(room::get_locations))
        .merge(owner_only)
        .merge(user_only)
}

fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/order", post(payment::create_order))
        .route("/verify", post(payment::verify_payment))
}

async fn health() -> &'static str {
    "Roomlink API is running"
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/", get(health))
        .nest("/api/user", user_routes(&state))
        .nest("/api/owner", owner_routes(&state))
        .nest("/api/admin", admin_routes(&state))
        .nest("/api/room", room_routes(&state))
        .nest("/api/payment", payment_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        // Must not panic on a header-invalid origin
        let _ = cors_layer(&["http://localhost:5173".to_string(), "bad\norigin".to_string()]);
    }
}
