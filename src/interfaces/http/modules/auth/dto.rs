//! Authentication DTOs

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters Google appends to the callback URL
#[derive(Debug, Deserialize, IntoParams)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set when the user declined consent
    pub error: Option<String>,
}
