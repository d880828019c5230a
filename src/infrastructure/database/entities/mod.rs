//! Database entities module

pub mod daily_view;
pub mod listing;
pub mod listing_photo;
pub mod listing_tag;
pub mod user;

pub use daily_view::Entity as DailyView;
pub use listing::Entity as Listing;
pub use listing_photo::Entity as ListingPhoto;
pub use listing_tag::Entity as ListingTag;
pub use user::Entity as User;
