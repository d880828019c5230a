//! User repository interface

use async_trait::async_trait;

use super::model::{ExternalProfile, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_google_id(&self, google_id: &str) -> DomainResult<Option<User>>;
    async fn create(&self, profile: &ExternalProfile) -> DomainResult<User>;
}
