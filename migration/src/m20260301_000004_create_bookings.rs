//! Bookings record a user's purchase of a room.
//!
//! The unique (user_id, room_id) index is the authoritative duplicate-purchase
//! guard; the application pre-check only avoids a wasted transaction.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(pk_auto(Bookings::Id))
                    .col(integer(Bookings::UserId))
                    .col(integer(Bookings::RoomId))
                    .col(integer_null(Bookings::CreatorId))
                    .col(string_null(Bookings::PaymentId))
                    .col(decimal_len(Bookings::Amount, 12, 2))
                    .col(integer(Bookings::Duration).default(1))
                    .col(string_len(Bookings::Status, 16).default("Confirmed"))
                    .col(timestamp_with_time_zone(Bookings::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Bookings::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user_room")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .col(Bookings::RoomId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_room_id")
                    .table(Bookings::Table)
                    .col(Bookings::RoomId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    UserId,
    RoomId,
    CreatorId,
    PaymentId,
    Amount,
    Duration,
    Status,
    CreatedAt,
    UpdatedAt,
}
