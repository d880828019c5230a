//! Listing photo entity for database

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Photo slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PhotoKind {
    #[sea_orm(string_value = "top")]
    Top,
    #[sea_orm(string_value = "sub")]
    Sub,
    #[sea_orm(string_value = "calendar")]
    Calendar,
}

/// Listing photo model - a compressed image file in the upload directory
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listing_photos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub listing_id: i32,
    pub kind: PhotoKind,

    /// Display order within the slot, starting at 0
    pub position: i32,

    pub file_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::listing::Entity",
        from = "Column::ListingId",
        to = "super::listing::Column::Id",
        on_delete = "Cascade"
    )]
    Listing,
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
