//! Listing aggregate
//!
//! A listing is a student club entry: descriptive text, tags, slider
//! ratings, photos and an access secret guarding edits.

pub mod model;
pub mod repository;

pub use model::{
    normalize_tags, Listing, ListingFields, ListingPhotos, ListingSubmission, ListingUpdate,
    NewListing, PhotoKind, SLIDER_COUNT,
};
pub use repository::ListingRepository;
