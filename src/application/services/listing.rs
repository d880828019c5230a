//! Listing service: search, detail and CRUD use-cases
//!
//! HTTP handlers stay thin and delegate here. View counting is
//! best-effort: a failed counter update never fails the page.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::{info, warn};

use crate::domain::{
    DomainError, DomainResult, Listing, ListingPhotos, ListingSubmission, ListingUpdate,
    NewListing, PhotoKind, RepositoryProvider, SearchFilter,
};
use crate::infrastructure::crypto::password::hash_secret;
use crate::shared::PaginatedResult;

pub struct ListingService {
    repos: Arc<dyn RepositoryProvider>,
    secret_cost: u32,
}

/// Seed for the home page ordering; changes once per calendar day.
pub fn day_seed(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

impl ListingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, secret_cost: u32) -> Self {
        Self { repos, secret_cost }
    }

    pub async fn search(&self, filter: &SearchFilter) -> DomainResult<PaginatedResult<Listing>> {
        metrics::counter!("searches_total").increment(1);
        self.repos.listings().search(filter).await
    }

    /// Listings for a visitor's saved ids, ascending by id.
    pub async fn favorites(&self, ids: &[i32]) -> DomainResult<Vec<Listing>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.repos.listings().find_by_ids(ids).await
    }

    pub async fn home(&self, page: u32, today: NaiveDate) -> DomainResult<PaginatedResult<Listing>> {
        self.repos
            .listings()
            .shuffled_page(page, day_seed(today))
            .await
    }

    /// Detail page: counts one view for `today`, then loads the listing.
    /// A view that cannot be recorded (an unknown id trips the foreign key)
    /// is logged and the fetch still decides the outcome.
    pub async fn view(&self, id: i32, today: NaiveDate) -> DomainResult<Listing> {
        match self.repos.daily_views().record_view(id, today).await {
            Ok(()) => metrics::counter!("listing_views_total").increment(1),
            Err(e) => warn!(listing_id = id, "Failed to record view: {}", e),
        }

        self.get(id).await
    }

    /// Loads a listing without counting a view.
    pub async fn get(&self, id: i32) -> DomainResult<Listing> {
        self.repos
            .listings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::listing_not_found(id))
    }

    pub async fn create(
        &self,
        submission: ListingSubmission,
        photos: ListingPhotos,
        created_by: Option<String>,
    ) -> DomainResult<i32> {
        let (fields, secret) = submission.into_fields()?;
        let secret =
            secret.ok_or_else(|| DomainError::Validation("password is required".into()))?;
        let secret_hash = self.hash(secret).await?;

        let name = fields.name.clone();
        let id = self
            .repos
            .listings()
            .create(NewListing {
                fields,
                photos,
                secret_hash,
                created_by,
            })
            .await?;

        info!(listing_id = id, "📝 Listing created: {}", name);
        Ok(id)
    }

    /// Applies an edit. Photo slots not present in `photos` keep their
    /// files. Returns the file names of replaced photos.
    pub async fn update(
        &self,
        id: i32,
        submission: ListingSubmission,
        photos: Vec<(PhotoKind, Vec<String>)>,
    ) -> DomainResult<Vec<String>> {
        let (fields, secret) = submission.into_fields()?;
        let secret_hash = match secret {
            Some(secret) => Some(self.hash(secret).await?),
            None => None,
        };

        let replaced = self
            .repos
            .listings()
            .update(
                id,
                ListingUpdate {
                    fields,
                    photos,
                    secret_hash,
                },
            )
            .await?;

        info!(listing_id = id, "✏️ Listing updated");
        Ok(replaced)
    }

    /// Deletes a listing and returns its photo file names.
    pub async fn delete(&self, id: i32) -> DomainResult<Vec<String>> {
        let files = self.repos.listings().delete(id).await?;
        info!(listing_id = id, "🗑️ Listing deleted");
        Ok(files)
    }

    async fn hash(&self, secret: String) -> DomainResult<String> {
        let cost = self.secret_cost;
        tokio::task::spawn_blocking(move || hash_secret(&secret, cost))
            .await
            .map_err(|e| DomainError::Storage(format!("Hashing task failed: {}", e)))?
            .map_err(|e| DomainError::Storage(format!("Failed to hash secret: {}", e)))
    }
}
