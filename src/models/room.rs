//! Models for room listing and owner room management

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::rooms;
use crate::models::error::missing_fields;
use crate::services::image_host::ImageUpload;
use crate::services::rooms::{NewRoom, RoomChanges};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomResponse {
    pub message: String,
    pub room: rooms::Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomsResponse {
    pub message: String,
    pub rooms: Vec<rooms::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Multipart room form as sent by the owner dashboard. Text fields arrive
/// as strings and are parsed on conversion.
#[derive(Debug, Clone, Default)]
pub struct RoomForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price: Option<String>,
    pub available: Option<String>,
    pub rating: Option<String>,
    pub gender: Option<String>,
    pub amenities: Option<String>,
    pub image: Option<ImageUpload>,
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!("Invalid value for available: {}", other)),
    }
}

fn parse_price(raw: &str) -> Result<Decimal, String> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| format!("Invalid value for price: {}", raw))
}

fn parse_rating(raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .ok_or_else(|| format!("Invalid value for rating: {}", raw))
}

impl RoomForm {
    /// Records a text field; blank values and unknown names are ignored.
    pub fn set_text(&mut self, name: &str, value: String) {
        let value = value.trim().to_string();
        if value.is_empty() {
            return;
        }
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "location" => &mut self.location,
            "price" => &mut self.price,
            "available" => &mut self.available,
            "rating" => &mut self.rating,
            "gender" => &mut self.gender,
            "amenities" => &mut self.amenities,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Every field and the image are required to create a room.
    pub fn into_new_room(self) -> Result<(NewRoom, ImageUpload), String> {
        if let Some(msg) = missing_fields(&[
            ("title", self.title.is_some()),
            ("description", self.description.is_some()),
            ("location", self.location.is_some()),
            ("price", self.price.is_some()),
            ("available", self.available.is_some()),
            ("rating", self.rating.is_some()),
            ("gender", self.gender.is_some()),
            ("amenities", self.amenities.is_some()),
        ]) {
            return Err(msg);
        }
        let image = self.image.ok_or_else(|| "No file uploaded".to_string())?;

        let room = NewRoom {
            price: parse_price(self.price.as_deref().unwrap_or_default())?,
            available: parse_bool(self.available.as_deref().unwrap_or_default())?,
            rating: parse_rating(self.rating.as_deref().unwrap_or_default())?,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            gender: self.gender.unwrap_or_default(),
            amenities: self.amenities.unwrap_or_default(),
        };
        Ok((room, image))
    }

    pub fn into_changes(self) -> Result<(RoomChanges, Option<ImageUpload>), String> {
        let changes = RoomChanges {
            price: self.price.as_deref().map(parse_price).transpose()?,
            available: self.available.as_deref().map(parse_bool).transpose()?,
            rating: self.rating.as_deref().map(parse_rating).transpose()?,
            title: self.title,
            description: self.description,
            location: self.location,
            gender: self.gender,
            amenities: self.amenities,
        };
        Ok((changes, self.image))
    }
}
