//! Account tables for the three roles: users, owners and admins.
//!
//! Each role logs in against its own table, so emails are unique per table.

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Name))
                    .col(string_uniq(Users::Email))
                    .col(string(Users::PasswordHash))
                    .col(string(Users::MobileNo))
                    .col(string(Users::Role).default("user"))
                    .col(string_null(Users::ProfilePicUrl))
                    .col(timestamp_with_time_zone(Users::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Owners::Table)
                    .if_not_exists()
                    .col(pk_auto(Owners::Id))
                    .col(string(Owners::Username))
                    .col(string_uniq(Owners::Email))
                    .col(string(Owners::PasswordHash))
                    .col(timestamp_with_time_zone(Owners::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(pk_auto(Admins::Id))
                    .col(string(Admins::Username))
                    .col(string_uniq(Admins::Email))
                    .col(string(Admins::PasswordHash))
                    .col(timestamp_with_time_zone(Admins::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Owners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    MobileNo,
    Role,
    ProfilePicUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Owners {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    CreatedAt,
}
