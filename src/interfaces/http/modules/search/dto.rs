//! Search DTOs

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Listing, SearchFilter};
use crate::interfaces::http::modules::listings::ListingDto;
use crate::shared::PaginatedResult;

/// One page of listings plus the criteria that produced it.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub listings: Vec<ListingDto>,
    /// Matching listings across all pages
    pub total: u64,
    pub total_pages: u32,
    pub page: u32,
    pub name: Option<String>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub is_favorite: bool,
}

impl SearchResponse {
    pub fn new(page: PaginatedResult<Listing>, filter: SearchFilter) -> Self {
        Self {
            total: page.total,
            total_pages: page.total_pages,
            page: page.page,
            listings: page.items.into_iter().map(ListingDto::from).collect(),
            name: filter.name,
            genres: filter.genres,
            tags: filter.tags,
            is_favorite: false,
        }
    }
}

/// Listings for a set of saved ids, ascending by id.
#[derive(Debug, Serialize, ToSchema)]
pub struct FavoritesResponse {
    pub listings: Vec<ListingDto>,
    pub total: usize,
    pub is_favorite: bool,
}

impl FavoritesResponse {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            total: listings.len(),
            listings: listings.into_iter().map(ListingDto::from).collect(),
            is_favorite: true,
        }
    }
}
