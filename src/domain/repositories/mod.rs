//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to the per-aggregate
//! repositories. Consumers request only the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let listing = repos.listings().find_by_id(7).await?;
//!     repos.daily_views().record_view(7, today).await?;
//! }
//! ```

use super::daily_view::DailyViewRepository;
use super::listing::ListingRepository;
use super::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn listings(&self) -> &dyn ListingRepository;
    fn daily_views(&self) -> &dyn DailyViewRepository;
    fn users(&self) -> &dyn UserRepository;
}
