//! SeaORM Entity for rooms
//!
//! `available` starts true and is flipped to false only by a committed
//! purchase (or explicitly by the owning account through a room update).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: String,
    /// Monthly price in major currency units
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub available: bool,
    pub rating: f64,
    /// Gender preference tag (e.g. "Male", "Female", "Any")
    pub gender: String,
    #[sea_orm(column_type = "Text")]
    pub amenities: String,
    /// Image hosting identifier, used to destroy the image with the room
    pub image_public_id: String,
    pub image_url: String,
    /// Owning account; optional for rooms created before ownership tracking
    pub creator_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
