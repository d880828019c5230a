//! View statistics for listing owners and site operators

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use crate::domain::{
    DailyTotal, DailyView, DomainError, DomainResult, Listing, ListingViewTotal,
    RepositoryProvider,
};

/// How far back the per-listing stats page looks.
pub const STATS_WINDOW_DAYS: i64 = 15;

#[derive(Debug, Clone)]
pub struct ListingStats {
    pub listing: Listing,
    /// Oldest first
    pub daily_views: Vec<DailyView>,
}

#[derive(Debug, Clone)]
pub struct SiteStats {
    pub total_listings: u64,
    pub total_views: i64,
    pub views_by_day: Vec<DailyTotal>,
    pub listings: Vec<ListingViewTotal>,
}

pub struct StatsService {
    repos: Arc<dyn RepositoryProvider>,
}

impl StatsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Daily views of one listing since `today - 15 days`. A listing with
    /// no recent views still yields its summary.
    pub async fn listing_stats(&self, id: i32, today: NaiveDate) -> DomainResult<ListingStats> {
        let listing = self
            .repos
            .listings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::listing_not_found(id))?;

        let since = today - Duration::days(STATS_WINDOW_DAYS);
        let daily_views = self
            .repos
            .daily_views()
            .find_for_listing_since(id, since)
            .await?;

        Ok(ListingStats {
            listing,
            daily_views,
        })
    }

    pub async fn site_stats(&self) -> DomainResult<SiteStats> {
        let views = self.repos.daily_views();
        Ok(SiteStats {
            total_listings: self.repos.listings().count().await?,
            total_views: views.total_views().await?,
            views_by_day: views.totals_by_day().await?,
            listings: views.listing_totals().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::password::MIN_COST;
    use crate::application::services::listing::tests::{submission, test_repos};
    use crate::application::services::ListingService;
    use crate::domain::ListingPhotos;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[tokio::test]
    async fn listing_stats_cover_the_last_fifteen_days() {
        let repos = test_repos().await;
        let listings = ListingService::new(repos.clone(), MIN_COST);
        let stats = StatsService::new(repos.clone());
        let id = listings
            .create(submission("Chess", "Culture", Some("pw")), ListingPhotos::default(), None)
            .await
            .unwrap();

        listings.view(id, day(1)).await.unwrap();
        listings.view(id, day(10)).await.unwrap();
        listings.view(id, day(20)).await.unwrap();
        listings.view(id, day(20)).await.unwrap();

        let result = stats.listing_stats(id, day(20)).await.unwrap();
        assert_eq!(result.listing.id, id);
        let days: Vec<_> = result.daily_views.iter().map(|v| v.view_date).collect();
        assert_eq!(days, vec![day(10), day(20)]);
        assert_eq!(result.daily_views[1].view_count, 2);
    }

    #[tokio::test]
    async fn listing_without_views_has_empty_stats() {
        let repos = test_repos().await;
        let listings = ListingService::new(repos.clone(), MIN_COST);
        let id = listings
            .create(submission("Chess", "Culture", Some("pw")), ListingPhotos::default(), None)
            .await
            .unwrap();

        let result = StatsService::new(repos).listing_stats(id, day(5)).await.unwrap();
        assert!(result.daily_views.is_empty());
    }

    #[tokio::test]
    async fn unknown_listing_stats_are_not_found() {
        let stats = StatsService::new(test_repos().await);
        let result = stats.listing_stats(3, day(5)).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn site_stats_summarise_everything() {
        let repos = test_repos().await;
        let listings = ListingService::new(repos.clone(), MIN_COST);
        let a = listings
            .create(submission("Chess", "Culture", Some("pw")), ListingPhotos::default(), None)
            .await
            .unwrap();
        listings
            .create(submission("Tennis", "Sports", Some("pw")), ListingPhotos::default(), None)
            .await
            .unwrap();
        listings.view(a, day(1)).await.unwrap();
        listings.view(a, day(2)).await.unwrap();

        let site = StatsService::new(repos).site_stats().await.unwrap();
        assert_eq!(site.total_listings, 2);
        assert_eq!(site.total_views, 2);
        assert_eq!(site.views_by_day.len(), 2);
        assert_eq!(site.listings[0].listing_id, a);
        assert_eq!(site.listings[1].total_views, 0);
    }
}
