//! Listing repository interface

use async_trait::async_trait;

use super::model::{Listing, ListingUpdate, NewListing};
use crate::domain::search::SearchFilter;
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Filtered, tag-ranked page of listings.
    async fn search(&self, filter: &SearchFilter) -> DomainResult<PaginatedResult<Listing>>;

    /// Listings whose ids are in `ids`, ascending by id. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<Listing>>;

    /// Home page ordering, stable for a given `seed`.
    async fn shuffled_page(&self, page: u32, seed: i64) -> DomainResult<PaginatedResult<Listing>>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Listing>>;
    async fn find_secret_hash(&self, id: i32) -> DomainResult<Option<String>>;
    async fn create(&self, listing: NewListing) -> DomainResult<i32>;

    /// Returns the file names of photos that the update replaced.
    async fn update(&self, id: i32, update: ListingUpdate) -> DomainResult<Vec<String>>;

    /// Removes the listing with its tags, photos and view counters.
    /// Returns the photo file names that were attached to it.
    async fn delete(&self, id: i32) -> DomainResult<Vec<String>>;

    async fn count(&self) -> DomainResult<u64>;
}
