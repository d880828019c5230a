//! User domain entity

use chrono::{DateTime, Utc};

/// A visitor who signed in through Google.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub google_id: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile data returned by the identity provider.
#[derive(Debug, Clone)]
pub struct ExternalProfile {
    pub provider_id: String,
    pub name: String,
    pub email: Option<String>,
}
