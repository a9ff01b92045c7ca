//! Purchase commit: reserve a room for a user exactly once
//!
//! Pre-checks (room exists, room available, no prior booking) reject early
//! without writing. The writes run in one transaction: the room is flipped
//! with a compare-and-swap on `available`, then the booking is inserted. The
//! unique `(user_id, room_id)` index on bookings is the final arbiter for
//! duplicate purchases; any failure rolls the room flip back.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entities::bookings::{self, BookingStatus};
use crate::entities::prelude::{Bookings, Rooms};
use crate::entities::rooms;

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("{0}")]
    Invalid(String),
    #[error("Room not Found")]
    RoomNotFound,
    #[error("Room is not available for purchase")]
    RoomUnavailable,
    #[error("User already Purchased this room")]
    AlreadyPurchased,
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseInput {
    pub payment_id: Option<String>,
    pub amount: Option<Decimal>,
    pub duration: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub booking: bookings::Model,
    /// Room as it stands after the purchase
    pub room: rooms::Model,
}

fn validate(input: &PurchaseInput) -> Result<(), PurchaseError> {
    if let Some(duration) = input.duration {
        if duration < 1 {
            return Err(PurchaseError::Invalid(
                "Duration must be at least 1 month".to_string(),
            ));
        }
    }
    if let Some(amount) = input.amount {
        if amount <= Decimal::ZERO {
            return Err(PurchaseError::Invalid(
                "Amount must be greater than 0".to_string(),
            ));
        }
    }
    Ok(())
}

async fn has_booking(
    db: &DatabaseConnection,
    user_id: i32,
    room_id: i32,
) -> Result<bool, DbErr> {
    Ok(Bookings::find()
        .filter(bookings::Column::UserId.eq(user_id))
        .filter(bookings::Column::RoomId.eq(room_id))
        .one(db)
        .await?
        .is_some())
}

pub async fn commit_purchase(
    db: &DatabaseConnection,
    user_id: i32,
    room_id: i32,
    input: PurchaseInput,
) -> Result<PurchaseOutcome, PurchaseError> {
    let correlation_id = Uuid::new_v4();
    debug!(%correlation_id, user_id, room_id, "Purchase requested");

    validate(&input)?;

    let room = Rooms::find_by_id(room_id)
        .one(db)
        .await?
        .ok_or(PurchaseError::RoomNotFound)?;

    if !room.available {
        // A caller who already owns the booking is told so, everyone else
        // sees the room as taken.
        if has_booking(db, user_id, room_id).await? {
            return Err(PurchaseError::AlreadyPurchased);
        }
        return Err(PurchaseError::RoomUnavailable);
    }

    if has_booking(db, user_id, room_id).await? {
        return Err(PurchaseError::AlreadyPurchased);
    }

    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    let txn = db.begin().await?;

    let flipped = Rooms::update_many()
        .set(rooms::ActiveModel {
            available: Set(false),
            updated_at: Set(now),
            ..Default::default()
        })
        .filter(rooms::Column::Id.eq(room_id))
        .filter(rooms::Column::Available.eq(true))
        .exec(&txn)
        .await?;

    if flipped.rows_affected != 1 {
        txn.rollback().await?;
        info!(%correlation_id, user_id, room_id, "Lost race for room");
        return Err(PurchaseError::RoomUnavailable);
    }

    let inserted = bookings::ActiveModel {
        user_id: Set(user_id),
        room_id: Set(room_id),
        creator_id: Set(room.creator_id),
        payment_id: Set(input.payment_id.clone()),
        amount: Set(input.amount.unwrap_or(room.price)),
        duration: Set(input.duration.unwrap_or(1)),
        status: Set(BookingStatus::Confirmed),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await;

    let booking = match inserted {
        Ok(booking) => booking,
        Err(err) => {
            txn.rollback().await?;
            return Err(match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    warn!(%correlation_id, user_id, room_id, "Duplicate booking rejected by store");
                    PurchaseError::AlreadyPurchased
                }
                _ => PurchaseError::Database(err),
            });
        }
    };

    txn.commit().await?;

    info!(
        %correlation_id,
        user_id,
        room_id,
        booking_id = booking.id,
        amount = %booking.amount,
        "Room purchased"
    );

    Ok(PurchaseOutcome {
        booking,
        room: rooms::Model {
            available: false,
            updated_at: now,
            ..room
        },
    })
}

/// The caller's bookings together with the rooms they reference.
pub async fn list_user_bookings(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<(Vec<bookings::Model>, Vec<rooms::Model>), DbErr> {
    let booked = Bookings::find()
        .filter(bookings::Column::UserId.eq(user_id))
        .order_by_desc(bookings::Column::CreatedAt)
        .all(db)
        .await?;

    if booked.is_empty() {
        return Ok((booked, Vec::new()));
    }

    let room_ids: Vec<i32> = booked.iter().map(|b| b.room_id).collect();
    let rooms = Rooms::find()
        .filter(rooms::Column::Id.is_in(room_ids))
        .all(db)
        .await?;

    Ok((booked, rooms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(validate(&PurchaseInput::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let input = PurchaseInput {
            duration: Some(0),
            ..Default::default()
        };
        assert!(matches!(validate(&input), Err(PurchaseError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_amount() {
        let input = PurchaseInput {
            amount: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(matches!(validate(&input), Err(PurchaseError::Invalid(_))));
    }
}
