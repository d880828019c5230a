//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod daily_view_repository;
pub mod listing_repository;
pub mod repository_provider;
pub mod user_repository;

pub use daily_view_repository::SeaOrmDailyViewRepository;
pub use listing_repository::SeaOrmListingRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;
