//! Identity service: OAuth sign-in orchestration
//!
//! The HTTP layer owns the session; this service only talks to the
//! provider and the user repository.

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::info;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, User};
use crate::infrastructure::oauth::OAuthProvider;

const STATE_LEN: usize = 32;

pub struct IdentityService {
    repos: Arc<dyn RepositoryProvider>,
    provider: Option<Arc<dyn OAuthProvider>>,
}

impl IdentityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, provider: Option<Arc<dyn OAuthProvider>>) -> Self {
        Self { repos, provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> DomainResult<&dyn OAuthProvider> {
        self.provider
            .as_deref()
            .ok_or_else(|| DomainError::Unavailable("Sign-in is not configured".into()))
    }

    /// Starts a login: returns the provider URL and the CSRF state the
    /// caller must keep until the callback.
    pub fn begin_login(&self) -> DomainResult<(String, String)> {
        let provider = self.provider()?;
        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_LEN)
            .map(char::from)
            .collect();
        Ok((provider.authorization_url(&state), state))
    }

    /// Finishes a login: exchanges the code and finds or creates the user.
    pub async fn complete_login(&self, code: &str) -> DomainResult<User> {
        let provider = self.provider()?;
        let token = provider.exchange_code(code).await?;
        let profile = provider.get_user_info(&token).await?;

        let users = self.repos.users();
        if let Some(user) = users.find_by_google_id(&profile.provider_id).await? {
            info!(user_id = %user.id, "👤 User signed in via {}", provider.name());
            return Ok(user);
        }

        let user = users.create(&profile).await?;
        info!(user_id = %user.id, "👤 New user registered via {}", provider.name());
        Ok(user)
    }

    pub async fn find_user(&self, id: &str) -> DomainResult<Option<User>> {
        self.repos.users().find_by_id(id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::services::listing::tests::test_repos;
    use crate::domain::ExternalProfile;
    use async_trait::async_trait;

    /// Provider that accepts the code "good" and rejects everything else.
    pub(crate) struct FakeProvider;

    #[async_trait]
    impl OAuthProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        fn authorization_url(&self, state: &str) -> String {
            format!("https://login.example/auth?state={}", state)
        }

        async fn exchange_code(&self, code: &str) -> DomainResult<String> {
            if code == "good" {
                Ok("token".into())
            } else {
                Err(DomainError::Unauthorized("bad code".into()))
            }
        }

        async fn get_user_info(&self, _access_token: &str) -> DomainResult<ExternalProfile> {
            Ok(ExternalProfile {
                provider_id: "g-123".into(),
                name: "Ada".into(),
                email: Some("ada@example.com".into()),
            })
        }
    }

    #[tokio::test]
    async fn login_creates_user_once() {
        let service = IdentityService::new(test_repos().await, Some(Arc::new(FakeProvider)));

        let first = service.complete_login("good").await.unwrap();
        let second = service.complete_login("good").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.email.as_deref(), Some("ada@example.com"));

        let found = service.find_user(&first.id).await.unwrap().unwrap();
        assert_eq!(found.google_id, "g-123");
    }

    #[tokio::test]
    async fn rejected_code_is_unauthorized() {
        let service = IdentityService::new(test_repos().await, Some(Arc::new(FakeProvider)));
        let result = service.complete_login("bad").await;
        assert!(matches!(result, Err(DomainError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn login_state_is_random_and_embedded() {
        let service = IdentityService::new(test_repos().await, Some(Arc::new(FakeProvider)));
        let (url, state) = service.begin_login().unwrap();
        let (_, other) = service.begin_login().unwrap();

        assert_eq!(state.len(), STATE_LEN);
        assert!(url.ends_with(&state));
        assert_ne!(state, other);
    }

    #[tokio::test]
    async fn unconfigured_sign_in_is_unavailable() {
        let service = IdentityService::new(test_repos().await, None);
        assert!(!service.is_configured());
        assert!(matches!(service.begin_login(), Err(DomainError::Unavailable(_))));
        assert!(matches!(
            service.complete_login("good").await,
            Err(DomainError::Unavailable(_))
        ));
    }
}
