//! Google OAuth provider implementation

use async_trait::async_trait;
use oauth2::{
    basic::BasicErrorResponse, AuthUrl, AuthorizationCode, Client, ClientId, ClientSecret,
    CsrfToken, EmptyExtraTokenFields, RedirectUrl, Scope, StandardRevocableToken,
    StandardTokenIntrospectionResponse, StandardTokenResponse, TokenResponse, TokenUrl,
};
use reqwest::Client as HttpClient;
use tracing::warn;

use super::OAuthProvider;
use crate::domain::{DomainError, DomainResult, ExternalProfile};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Type alias for our configured OAuth client
type ConfiguredClient = Client<
    BasicErrorResponse,
    StandardTokenResponse<EmptyExtraTokenFields, oauth2::basic::BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, oauth2::basic::BasicTokenType>,
    StandardRevocableToken,
    BasicErrorResponse,
    oauth2::EndpointSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointNotSet,
    oauth2::EndpointSet,
>;

/// Google OAuth provider requesting the `profile` and `email` scopes
#[derive(Clone)]
pub struct GoogleProvider {
    client: ConfiguredClient,
    http_client: HttpClient,
}

impl GoogleProvider {
    pub fn new(client_id: &str, client_secret: &str, callback_url: &str) -> DomainResult<Self> {
        let invalid = |what: &str, e: oauth2::url::ParseError| {
            DomainError::Validation(format!("Invalid Google {}: {}", what, e))
        };

        let client = Client::new(ClientId::new(client_id.to_string()))
            .set_client_secret(ClientSecret::new(client_secret.to_string()))
            .set_auth_uri(AuthUrl::new(AUTH_URL.to_string()).map_err(|e| invalid("auth URL", e))?)
            .set_token_uri(
                TokenUrl::new(TOKEN_URL.to_string()).map_err(|e| invalid("token URL", e))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(callback_url.to_string())
                    .map_err(|e| invalid("callback URL", e))?,
            );

        let http_client = HttpClient::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| DomainError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            http_client,
        })
    }
}

fn sign_in_failed(detail: impl std::fmt::Display) -> DomainError {
    warn!("Google sign-in failed: {}", detail);
    DomainError::Unauthorized("Google sign-in failed".to_string())
}

#[async_trait]
impl OAuthProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn authorization_url(&self, state: &str) -> String {
        let (url, _) = self
            .client
            .authorize_url(|| CsrfToken::new(state.to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .url();
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> DomainResult<String> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| sign_in_failed(format!("token exchange: {}", e)))?;

        Ok(token.access_token().secret().clone())
    }

    async fn get_user_info(&self, access_token: &str) -> DomainResult<ExternalProfile> {
        let response = self
            .http_client
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| sign_in_failed(format!("user info request: {}", e)))?;

        if !response.status().is_success() {
            return Err(sign_in_failed(format!("user info status {}", response.status())));
        }

        let info: serde_json::Value = response
            .json()
            .await
            .map_err(|e| sign_in_failed(format!("user info body: {}", e)))?;

        let provider_id = info["sub"]
            .as_str()
            .ok_or_else(|| sign_in_failed("missing sub in user info"))?
            .to_string();

        Ok(ExternalProfile {
            name: info["name"].as_str().unwrap_or(&provider_id).to_string(),
            email: info["email"].as_str().map(|s| s.to_string()),
            provider_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_url_carries_client_and_state() {
        let provider = GoogleProvider::new(
            "test-client-id",
            "test-secret",
            "https://circles.example.com/auth/google/callback",
        )
        .unwrap();
        let url = provider.authorization_url("test-state");

        assert!(url.starts_with(AUTH_URL));
        assert!(url.contains("client_id=test-client-id"));
        assert!(url.contains("state=test-state"));
        assert!(url.contains("redirect_uri="));
        assert!(url.contains("profile"));
        assert!(url.contains("email"));
    }

    #[test]
    fn invalid_callback_url_is_rejected() {
        let result = GoogleProvider::new("id", "secret", "not a url");
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
