//! Request/response models for room purchase and the user's bookings

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{bookings, rooms};

/// POST /api/room/buy/{roomId}; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Gateway payment id from a verified payment
    #[serde(default)]
    pub payment_id: Option<String>,
    /// Defaults to the room's monthly price
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Months, defaults to 1
    #[serde(default)]
    pub duration: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: i32,
    pub title: String,
    pub available: bool,
}

impl From<&rooms::Model> for RoomSummary {
    fn from(room: &rooms::Model) -> Self {
        Self {
            id: room.id,
            title: room.title.clone(),
            available: room.available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub message: String,
    pub purchase: bookings::Model,
    pub room: RoomSummary,
}

/// GET /api/user/booked
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedResponse {
    pub message: String,
    pub booked: Vec<bookings::Model>,
    pub rooms_data: Vec<rooms::Model>,
}
