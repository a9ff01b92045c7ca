//! Room listing and owner-side room management
//!
//! Every room carries a hosted image. Creating a room uploads the image
//! first, replacing an image uploads the new one before the row changes, and
//! deleting a room destroys its image before removing the row.
//!
//! A room with a confirmed booking stays unavailable: an owner update that
//! tries to mark it available again is refused.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::SelectStatement;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
    TransactionTrait,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::entities::bookings::{self, BookingStatus};
use crate::entities::prelude::{Bookings, Rooms};
use crate::entities::rooms;
use crate::services::image_host::{ImageHost, ImageHostError, ImageUpload, is_allowed_image_type};

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("{0}")]
    Invalid(String),
    #[error("Room Not Found")]
    NotFound,
    #[error("Room not found or you don't have permission to update it")]
    NotFoundOrNotOwned,
    #[error("You don't have permission to delete this room")]
    NotOwned,
    #[error("Room has a confirmed booking and cannot be made available")]
    Booked,
    #[error("Error uploading file to image host: {0}")]
    Image(#[from] ImageHostError),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRoom {
    pub title: String,
    pub description: String,
    pub location: String,
    pub price: Decimal,
    pub available: bool,
    pub rating: f64,
    pub gender: String,
    pub amenities: String,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price: Option<Decimal>,
    pub available: Option<bool>,
    pub rating: Option<f64>,
    pub gender: Option<String>,
    pub amenities: Option<String>,
}

/// Ids of rooms held by a confirmed booking
fn booked_room_ids() -> SelectStatement {
    Bookings::find()
        .select_only()
        .column(bookings::Column::RoomId)
        .filter(bookings::Column::Status.eq(BookingStatus::Confirmed))
        .into_query()
}

async fn has_confirmed_booking(db: &DatabaseConnection, room_id: i32) -> Result<bool, DbErr> {
    let count = Bookings::find()
        .filter(bookings::Column::RoomId.eq(room_id))
        .filter(bookings::Column::Status.eq(BookingStatus::Confirmed))
        .count(db)
        .await?;
    Ok(count > 0)
}

fn check_image(image: &ImageUpload) -> Result<(), RoomError> {
    if !is_allowed_image_type(&image.content_type) {
        return Err(RoomError::Invalid(
            "Invalid File Format. Only PNG and JPG are allowed".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_room(
    db: &DatabaseConnection,
    images: &dyn ImageHost,
    owner_id: i32,
    room: NewRoom,
    image: ImageUpload,
) -> Result<rooms::Model, RoomError> {
    check_image(&image)?;
    if room.price <= Decimal::ZERO {
        return Err(RoomError::Invalid("Price must be greater than 0".to_string()));
    }

    let uploaded = images.upload(image).await?;
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();

    let inserted = rooms::ActiveModel {
        title: Set(room.title),
        description: Set(room.description),
        location: Set(room.location),
        price: Set(room.price),
        available: Set(room.available),
        rating: Set(room.rating),
        gender: Set(room.gender),
        amenities: Set(room.amenities),
        image_public_id: Set(uploaded.public_id.clone()),
        image_url: Set(uploaded.url),
        creator_id: Set(Some(owner_id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await;

    match inserted {
        Ok(room) => {
            info!(room_id = room.id, owner_id, "Room created");
            Ok(room)
        }
        Err(err) => {
            if let Err(e) = images.destroy(&uploaded.public_id).await {
                warn!(public_id = %uploaded.public_id, error = %e, "Failed to clean up uploaded image");
            }
            Err(err.into())
        }
    }
}

pub async fn update_room(
    db: &DatabaseConnection,
    images: &dyn ImageHost,
    owner_id: i32,
    room_id: i32,
    changes: RoomChanges,
    image: Option<ImageUpload>,
) -> Result<rooms::Model, RoomError> {
    let existing = Rooms::find_by_id(room_id)
        .filter(rooms::Column::CreatorId.eq(owner_id))
        .one(db)
        .await?
        .ok_or(RoomError::NotFoundOrNotOwned)?;

    if let Some(price) = changes.price {
        if price <= Decimal::ZERO {
            return Err(RoomError::Invalid("Price must be greater than 0".to_string()));
        }
    }

    let relist = changes.available == Some(true);
    if relist && has_confirmed_booking(db, room_id).await? {
        warn!(room_id, owner_id, "Refused to relist a booked room");
        return Err(RoomError::Booked);
    }

    let uploaded = match image {
        Some(image) => {
            check_image(&image)?;
            Some(images.upload(image).await?)
        }
        None => None,
    };

    let old_public_id = existing.image_public_id.clone();
    let mut active = existing.into_active_model();

    if let Some(v) = changes.title {
        active.title = Set(v);
    }
    if let Some(v) = changes.description {
        active.description = Set(v);
    }
    if let Some(v) = changes.location {
        active.location = Set(v);
    }
    if let Some(v) = changes.price {
        active.price = Set(v);
    }
    if changes.available == Some(false) {
        active.available = Set(false);
    }
    if let Some(v) = changes.rating {
        active.rating = Set(v);
    }
    if let Some(v) = changes.gender {
        active.gender = Set(v);
    }
    if let Some(v) = changes.amenities {
        active.amenities = Set(v);
    }
    if let Some(ref uploaded) = uploaded {
        active.image_public_id = Set(uploaded.public_id.clone());
        active.image_url = Set(uploaded.url.clone());
    }
    active.updated_at = Set(Utc::now().into());

    let updated = match write_changes(db, active, room_id, relist).await {
        Ok(room) => room,
        Err(err) => {
            if let Some(uploaded) = uploaded {
                if let Err(e) = images.destroy(&uploaded.public_id).await {
                    warn!(public_id = %uploaded.public_id, error = %e, "Failed to clean up uploaded image");
                }
            }
            return Err(err);
        }
    };

    // The old image is only dropped once the row points at the new one
    if uploaded.is_some() {
        if let Err(e) = images.destroy(&old_public_id).await {
            warn!(room_id, public_id = %old_public_id, error = %e, "Failed to delete replaced image");
        }
    }

    info!(room_id, owner_id, image_replaced = uploaded.is_some(), "Room updated");
    Ok(updated)
}

/// Writes the update and, for a relist, flips `available` back on only while
/// no confirmed booking holds the room. Both happen in one transaction.
async fn write_changes(
    db: &DatabaseConnection,
    active: rooms::ActiveModel,
    room_id: i32,
    relist: bool,
) -> Result<rooms::Model, RoomError> {
    let txn = db.begin().await?;
    let mut updated = active.update(&txn).await?;

    if relist {
        let reopened = Rooms::update_many()
            .set(rooms::ActiveModel {
                available: Set(true),
                ..Default::default()
            })
            .filter(rooms::Column::Id.eq(room_id))
            .filter(rooms::Column::Id.not_in_subquery(booked_room_ids()))
            .exec(&txn)
            .await?;

        if reopened.rows_affected != 1 {
            txn.rollback().await?;
            warn!(room_id, "Room was booked while the relist was in flight");
            return Err(RoomError::Booked);
        }
        updated.available = true;
    }

    txn.commit().await?;
    Ok(updated)
}

pub async fn delete_room(
    db: &DatabaseConnection,
    images: &dyn ImageHost,
    owner_id: i32,
    room_id: i32,
) -> Result<(), RoomError> {
    let room = Rooms::find_by_id(room_id)
        .one(db)
        .await?
        .ok_or(RoomError::NotFound)?;

    if room.creator_id != Some(owner_id) {
        return Err(RoomError::NotOwned);
    }

    images.destroy(&room.image_public_id).await?;
    room.delete(db).await?;

    info!(room_id, owner_id, "Room deleted");
    Ok(())
}

pub async fn list_rooms(db: &DatabaseConnection) -> Result<Vec<rooms::Model>, DbErr> {
    Rooms::find().order_by_asc(rooms::Column::Id).all(db).await
}

pub async fn owner_rooms(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<Vec<rooms::Model>, DbErr> {
    Rooms::find()
        .filter(rooms::Column::CreatorId.eq(owner_id))
        .order_by_asc(rooms::Column::Id)
        .all(db)
        .await
}

pub async fn find_room(db: &DatabaseConnection, room_id: i32) -> Result<rooms::Model, RoomError> {
    Rooms::find_by_id(room_id)
        .one(db)
        .await?
        .ok_or(RoomError::NotFound)
}

/// Distinct room locations, sorted alphabetically.
pub async fn list_locations(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    Rooms::find()
        .select_only()
        .column(rooms::Column::Location)
        .distinct()
        .order_by_asc(rooms::Column::Location)
        .into_tuple::<String>()
        .all(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_image_rejects_gif() {
        let image = ImageUpload {
            bytes: vec![0u8; 4],
            file_name: "room.gif".to_string(),
            content_type: "image/gif".to_string(),
        };
        assert!(matches!(check_image(&image), Err(RoomError::Invalid(_))));
    }

    #[test]
    fn test_check_image_accepts_jpeg() {
        let image = ImageUpload {
            bytes: vec![0u8; 4],
            file_name: "room.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
        };
        assert!(check_image(&image).is_ok());
    }
}
