//! Payments track a gateway order from creation to verification.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk_auto(Payments::Id))
                    .col(string(Payments::OrderId))
                    .col(string_null(Payments::PaymentId))
                    .col(string_null(Payments::Signature))
                    .col(decimal_len(Payments::Amount, 12, 2))
                    .col(string_len(Payments::Currency, 3).default("INR"))
                    .col(string_len(Payments::Status, 16).default("Pending"))
                    .col(integer(Payments::UserId))
                    .col(timestamp_with_time_zone(Payments::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Verification updates exactly one row per gateway order
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_order_id")
                    .table(Payments::Table)
                    .col(Payments::OrderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_user_id")
                    .table(Payments::Table)
                    .col(Payments::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    OrderId,
    PaymentId,
    Signature,
    Amount,
    Currency,
    Status,
    UserId,
    CreatedAt,
}
