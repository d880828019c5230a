//! Listing entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Listing model - one club entry in the directory
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub comment: Option<String>,
    pub main_genre: String,
    pub sub_genre: Option<String>,
    pub other: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub admission_fee: Option<i32>,
    pub annual_fee: Option<i32>,
    pub location: Option<String>,
    pub instagram: Option<String>,

    /// Folded name, genres, other and location for substring search
    #[sea_orm(column_type = "Text")]
    #[serde(skip_serializing)]
    pub name_search: String,

    /// Folded main and sub genre
    #[serde(skip_serializing)]
    pub genre_search: String,

    pub slider1: i32,
    pub slider2: i32,
    pub slider3: i32,
    pub slider4: i32,

    /// bcrypt hash of the per-listing access secret
    #[serde(skip_serializing)]
    pub secret_hash: String,

    /// User who created the listing
    pub created_by: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::listing_tag::Entity")]
    Tags,

    #[sea_orm(has_many = "super::listing_photo::Entity")]
    Photos,

    #[sea_orm(has_many = "super::daily_view::Entity")]
    DailyViews,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Creator,
}

impl Related<super::listing_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl Related<super::listing_photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl Related<super::daily_view::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyViews.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn sliders(&self) -> [i32; 4] {
        [self.slider1, self.slider2, self.slider3, self.slider4]
    }
}
