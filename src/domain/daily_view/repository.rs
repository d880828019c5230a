//! Daily view repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{DailyTotal, DailyView, ListingViewTotal};
use crate::domain::DomainResult;

#[async_trait]
pub trait DailyViewRepository: Send + Sync {
    /// Adds one view for `(listing_id, date)`, creating the row if needed.
    async fn record_view(&self, listing_id: i32, date: NaiveDate) -> DomainResult<()>;

    /// Rows for one listing dated on or after `since`, oldest first.
    async fn find_for_listing_since(
        &self,
        listing_id: i32,
        since: NaiveDate,
    ) -> DomainResult<Vec<DailyView>>;

    async fn total_views(&self) -> DomainResult<i64>;

    /// Site-wide totals per day, oldest first.
    async fn totals_by_day(&self) -> DomainResult<Vec<DailyTotal>>;

    /// Every listing with its all-time views, most viewed first.
    async fn listing_totals(&self) -> DomainResult<Vec<ListingViewTotal>>;
}
