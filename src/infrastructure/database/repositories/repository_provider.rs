//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::{DailyViewRepository, ListingRepository, UserRepository};

use super::daily_view_repository::SeaOrmDailyViewRepository;
use super::listing_repository::SeaOrmListingRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let page = repos.listings().search(&filter).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    listings: SeaOrmListingRepository,
    daily_views: SeaOrmDailyViewRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            listings: SeaOrmListingRepository::new(db.clone()),
            daily_views: SeaOrmDailyViewRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn listings(&self) -> &dyn ListingRepository {
        &self.listings
    }

    fn daily_views(&self) -> &dyn DailyViewRepository {
        &self.daily_views
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
