//! Daily view counter entities

use chrono::NaiveDate;

/// Views of one listing on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyView {
    pub listing_id: i32,
    pub view_date: NaiveDate,
    pub view_count: i32,
}

/// Views across all listings for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTotal {
    pub view_date: NaiveDate,
    pub total_views: i64,
}

/// All-time views of a single listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingViewTotal {
    pub listing_id: i32,
    pub name: String,
    pub main_genre: String,
    pub total_views: i64,
}
