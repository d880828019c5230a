//! Domain layer
//!
//! Aggregates, their repository interfaces and the search criteria
//! type. Nothing here depends on the database or HTTP layers.

pub mod daily_view;
pub mod listing;
pub mod repositories;
pub mod search;
pub mod user;

pub use crate::shared::{DomainError, DomainResult};
pub use daily_view::{DailyTotal, DailyView, DailyViewRepository, ListingViewTotal};
pub use listing::{
    Listing, ListingFields, ListingPhotos, ListingRepository, ListingSubmission, ListingUpdate,
    NewListing, PhotoKind,
};
pub use repositories::RepositoryProvider;
pub use search::SearchFilter;
pub use user::{ExternalProfile, User, UserRepository};
