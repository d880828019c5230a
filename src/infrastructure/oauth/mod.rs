//! OAuth sign-in providers

pub mod google;

use async_trait::async_trait;

use crate::domain::{DomainResult, ExternalProfile};

pub use google::GoogleProvider;

/// An OAuth 2.0 identity provider.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Provider name (e.g., "google")
    fn name(&self) -> &str;

    /// URL the browser is redirected to; `state` is echoed back on callback.
    fn authorization_url(&self, state: &str) -> String;

    /// Exchanges an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> DomainResult<String>;

    /// Fetches the signed-in user's profile.
    async fn get_user_info(&self, access_token: &str) -> DomainResult<ExternalProfile>;
}
