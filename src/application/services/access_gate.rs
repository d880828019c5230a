//! Access gate for the owner-only listing pages
//!
//! A visitor unlocks a listing by presenting its secret. The unlock is
//! recorded in the visitor's session as a per-listing grant with an
//! expiry; edit, delete and stats pages check the grant instead of
//! asking for the secret again.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::password::verify_secret;

/// Default lifetime of a grant
pub const DEFAULT_GRANT_TTL_MINUTES: i64 = 30;

/// Checks listing secrets.
pub struct AccessGate {
    repos: Arc<dyn RepositoryProvider>,
    ttl: Duration,
}

impl AccessGate {
    pub fn new(repos: Arc<dyn RepositoryProvider>, ttl: Duration) -> Self {
        Self { repos, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Verifies `secret` against the listing's stored hash.
    ///
    /// A failed attempt never touches the caller's existing grants; the
    /// caller only adds a grant on `Ok`.
    pub async fn verify(&self, listing_id: i32, secret: &str) -> DomainResult<()> {
        if secret.is_empty() {
            return Err(DomainError::Validation("password is required".into()));
        }

        let hash = match self.repos.listings().find_secret_hash(listing_id).await? {
            Some(hash) => hash,
            None => {
                metrics::counter!("access_gate_attempts_total", "result" => "unknown")
                    .increment(1);
                return Err(DomainError::listing_not_found(listing_id));
            }
        };

        let secret = secret.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_secret(&secret, &hash))
            .await
            .map_err(|e| DomainError::Storage(format!("Verification task failed: {}", e)))?;

        if matches {
            metrics::counter!("access_gate_attempts_total", "result" => "granted").increment(1);
            info!(listing_id, "🔓 Listing unlocked");
            Ok(())
        } else {
            metrics::counter!("access_gate_attempts_total", "result" => "denied").increment(1);
            warn!(listing_id, "Wrong listing password");
            Err(DomainError::Forbidden("Incorrect password".into()))
        }
    }
}

/// Gate state stored in the visitor's session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateSession {
    /// Listing id -> grant expiry
    #[serde(default)]
    pub grants: HashMap<i32, DateTime<Utc>>,

    /// Set when an operator opened the site dashboard; admits the next
    /// stats page visit once.
    #[serde(default)]
    pub operator_bypass: bool,
}

impl GateSession {
    pub fn grant(&mut self, listing_id: i32, now: DateTime<Utc>, ttl: Duration) {
        self.grants.insert(listing_id, now + ttl);
    }

    pub fn is_granted(&self, listing_id: i32, now: DateTime<Utc>) -> bool {
        self.grants
            .get(&listing_id)
            .is_some_and(|expires_at| *expires_at > now)
    }

    /// Drops expired grants. Returns whether anything changed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> bool {
        let before = self.grants.len();
        self.grants.retain(|_, expires_at| *expires_at > now);
        before != self.grants.len()
    }

    pub fn arm_operator_bypass(&mut self) {
        self.operator_bypass = true;
    }

    /// Decides whether the visitor may open `listing_id`'s owner pages.
    ///
    /// An armed operator bypass is consumed and turned into a regular
    /// grant, so following links from the stats page keeps working.
    pub fn admit(&mut self, listing_id: i32, now: DateTime<Utc>, ttl: Duration) -> bool {
        if self.operator_bypass {
            self.operator_bypass = false;
            self.grant(listing_id, now, ttl);
            debug!(listing_id, "Operator bypass consumed");
            return true;
        }
        self.is_granted(listing_id, now)
    }
}
