//! Daily view aggregate
//!
//! One counter row per listing per UTC calendar day.

pub mod model;
pub mod repository;

pub use model::{DailyTotal, DailyView, ListingViewTotal};
pub use repository::DailyViewRepository;
