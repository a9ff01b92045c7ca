use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(pk_auto(Rooms::Id))
                    .col(string(Rooms::Title))
                    .col(text(Rooms::Description))
                    .col(string(Rooms::Location))
                    // Monthly price in major currency units
                    .col(decimal_len(Rooms::Price, 12, 2))
                    .col(boolean(Rooms::Available).default(true))
                    .col(double(Rooms::Rating))
                    .col(string(Rooms::Gender))
                    .col(text(Rooms::Amenities))
                    .col(string(Rooms::ImagePublicId))
                    .col(string(Rooms::ImageUrl))
                    .col(integer_null(Rooms::CreatorId))
                    .col(timestamp_with_time_zone(Rooms::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Rooms::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Owner dashboard lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_creator_id")
                    .table(Rooms::Table)
                    .col(Rooms::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_location")
                    .table(Rooms::Table)
                    .col(Rooms::Location)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
    Title,
    Description,
    Location,
    Price,
    Available,
    Rating,
    Gender,
    Amenities,
    ImagePublicId,
    ImageUrl,
    CreatorId,
    CreatedAt,
    UpdatedAt,
}
