//! Listing DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Listing;

/// Public path under which uploaded photos are served
pub const UPLOADS_PATH: &str = "/uploads";

pub fn photo_url(file_name: &str) -> String {
    format!("{}/{}", UPLOADS_PATH, file_name)
}

/// A listing as returned by the API. The access secret is never included.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingDto {
    pub id: i32,
    pub name: String,
    pub comment: Option<String>,
    pub main_genre: String,
    pub sub_genre: Option<String>,
    pub other: Option<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub admission_fee: Option<i32>,
    pub annual_fee: Option<i32>,
    pub location: Option<String>,
    pub instagram: Option<String>,
    pub slider1: i32,
    pub slider2: i32,
    pub slider3: i32,
    pub slider4: i32,
    pub top_photo: Option<String>,
    pub sub_photos: Vec<String>,
    pub calendar_photos: Vec<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Listing> for ListingDto {
    fn from(l: Listing) -> Self {
        let [slider1, slider2, slider3, slider4] = l.sliders;
        Self {
            id: l.id,
            name: l.name,
            comment: l.comment,
            main_genre: l.main_genre,
            sub_genre: l.sub_genre,
            other: l.other,
            tags: l.tags,
            description: l.description,
            admission_fee: l.admission_fee,
            annual_fee: l.annual_fee,
            location: l.location,
            instagram: l.instagram,
            slider1,
            slider2,
            slider3,
            slider4,
            top_photo: l.photos.top.as_deref().map(photo_url),
            sub_photos: l.photos.sub.iter().map(|f| photo_url(f)).collect(),
            calendar_photos: l.photos.calendar.iter().map(|f| photo_url(f)).collect(),
            created_by: l.created_by,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedListing {
    pub id: i32,
}
