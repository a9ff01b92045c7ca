//! Admin console listing responses

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{bookings, owners, payments, rooms, users};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingUser {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<users::Model> for BookingUser {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRoom {
    pub id: i32,
    pub title: String,
    pub location: String,
    pub price: Decimal,
    pub gender: String,
}

impl From<&rooms::Model> for BookingRoom {
    fn from(room: &rooms::Model) -> Self {
        Self {
            id: room.id,
            title: room.title.clone(),
            location: room.location.clone(),
            price: room.price,
            gender: room.gender.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingOwner {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<&owners::Model> for BookingOwner {
    fn from(owner: &owners::Model) -> Self {
        Self {
            id: owner.id,
            username: owner.username.clone(),
            email: owner.email.clone(),
        }
    }
}

/// A booking row with the records it points at
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: bookings::Model,
    pub user: Option<BookingUser>,
    pub room: Option<BookingRoom>,
    pub owner: Option<BookingOwner>,
    pub payment: Option<payments::Model>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsListResponse {
    pub message: String,
    pub total_bookings: usize,
    pub bookings: Vec<BookingDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingInfoResponse {
    pub message: String,
    pub booking: BookingDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersListResponse {
    pub message: String,
    pub users: Vec<users::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfoResponse {
    pub message: String,
    pub user: users::Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnersListResponse {
    pub message: String,
    pub owners: Vec<owners::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerInfoResponse {
    pub message: String,
    pub owner: owners::Model,
}

/// Room listings reuse [`crate::models::room::RoomsResponse`]
pub type RoomsListResponse = crate::models::room::RoomsResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInfoResponse {
    pub message: String,
    pub room: rooms::Model,
}
