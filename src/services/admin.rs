//! Booking views for the admin console
//!
//! Each booking is returned with its tenant, room, owner and payment. Any of
//! them may be gone (a deleted room, an unverified payment), so each is
//! optional.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::prelude::{Bookings, Owners, Payments, Rooms, Users};
use crate::entities::{bookings, owners, payments, rooms, users};
use crate::models::admin::{BookingDetails, BookingOwner, BookingRoom, BookingUser};

pub async fn list_booking_details(db: &DatabaseConnection) -> Result<Vec<BookingDetails>, DbErr> {
    let rows = Bookings::find()
        .find_also_related(Users)
        .order_by_desc(bookings::Column::CreatedAt)
        .all(db)
        .await?;

    attach_details(db, rows).await
}

pub async fn find_booking_details(
    db: &DatabaseConnection,
    booking_id: i32,
) -> Result<Option<BookingDetails>, DbErr> {
    let rows = Bookings::find_by_id(booking_id)
        .find_also_related(Users)
        .all(db)
        .await?;

    Ok(attach_details(db, rows).await?.pop())
}

/// Batch-loads rooms, owners and payments for the given bookings
async fn attach_details(
    db: &DatabaseConnection,
    rows: Vec<(bookings::Model, Option<users::Model>)>,
) -> Result<Vec<BookingDetails>, DbErr> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let room_ids: Vec<i32> = rows.iter().map(|(b, _)| b.room_id).collect();
    let owner_ids: Vec<i32> = rows.iter().filter_map(|(b, _)| b.creator_id).collect();
    let payment_ids: Vec<String> = rows
        .iter()
        .filter_map(|(b, _)| b.payment_id.clone())
        .collect();

    let rooms: HashMap<i32, rooms::Model> = Rooms::find()
        .filter(rooms::Column::Id.is_in(room_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|room| (room.id, room))
        .collect();

    let owners: HashMap<i32, owners::Model> = if owner_ids.is_empty() {
        HashMap::new()
    } else {
        Owners::find()
            .filter(owners::Column::Id.is_in(owner_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|owner| (owner.id, owner))
            .collect()
    };

    let payments: HashMap<String, payments::Model> = if payment_ids.is_empty() {
        HashMap::new()
    } else {
        Payments::find()
            .filter(payments::Column::PaymentId.is_in(payment_ids))
            .all(db)
            .await?
            .into_iter()
            .filter_map(|payment| payment.payment_id.clone().map(|id| (id, payment)))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|(booking, user)| BookingDetails {
            user: user.map(BookingUser::from),
            room: rooms.get(&booking.room_id).map(BookingRoom::from),
            owner: booking
                .creator_id
                .and_then(|id| owners.get(&id))
                .map(BookingOwner::from),
            payment: booking
                .payment_id
                .as_ref()
                .and_then(|id| payments.get(id))
                .cloned(),
            booking,
        })
        .collect())
}
