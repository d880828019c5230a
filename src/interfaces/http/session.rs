//! Cookie session layer and the values kept in it
//!
//! Three keys are used: the signed-in user, the access gate state and
//! the pending OAuth `state` value.

use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use time::Duration;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_memory_store::MemoryStore;
use utoipa::ToSchema;

use super::common::{ApiError, ApiResult};
use crate::application::{AccessGate, GateSession};
use crate::config::SessionSection;
use crate::domain::User;

const USER_KEY: &str = "user";
const GATE_KEY: &str = "access_gate";
const OAUTH_STATE_KEY: &str = "oauth_state";

/// Builds the signed-cookie session layer over an in-memory store.
pub fn create_session_layer(
    config: &SessionSection,
    key: Key,
) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(config.max_age_days)))
        .with_signed(key)
}

/// The signed-in user as stored in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

pub async fn current_user(session: &Session) -> ApiResult<Option<SessionUser>> {
    Ok(session.get::<SessionUser>(USER_KEY).await?)
}

/// The signed-in user, or 401.
pub async fn require_user(session: &Session) -> ApiResult<SessionUser> {
    current_user(session)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Sign in required"))
}

/// Stores `user` under a fresh session id.
pub async fn sign_in(session: &Session, user: SessionUser) -> ApiResult<()> {
    session.cycle_id().await?;
    session.insert(USER_KEY, user).await?;
    Ok(())
}

pub async fn sign_out(session: &Session) -> ApiResult<()> {
    session.flush().await?;
    Ok(())
}

pub async fn store_oauth_state(session: &Session, state: &str) -> ApiResult<()> {
    session.insert(OAUTH_STATE_KEY, state).await?;
    Ok(())
}

/// Removes and returns the pending OAuth state; it is valid once.
pub async fn take_oauth_state(session: &Session) -> ApiResult<Option<String>> {
    Ok(session.remove::<String>(OAUTH_STATE_KEY).await?)
}

/// Reads the gate state, dropping expired grants.
pub async fn load_gate(session: &Session) -> ApiResult<GateSession> {
    let mut gate: GateSession = session.get(GATE_KEY).await?.unwrap_or_default();
    if gate.prune(Utc::now()) {
        save_gate(session, &gate).await?;
    }
    Ok(gate)
}

pub async fn save_gate(session: &Session, gate: &GateSession) -> ApiResult<()> {
    session.insert(GATE_KEY, gate).await?;
    Ok(())
}

/// Records a successful unlock of `listing_id`.
pub async fn grant_listing(session: &Session, gate: &AccessGate, listing_id: i32) -> ApiResult<()> {
    let mut state = load_gate(session).await?;
    state.grant(listing_id, Utc::now(), gate.ttl());
    save_gate(session, &state).await
}

/// Lets the request through when the visitor holds a live grant for
/// `listing_id` or an armed operator bypass; otherwise 403.
pub async fn require_listing_access(
    session: &Session,
    gate: &AccessGate,
    listing_id: i32,
) -> ApiResult<()> {
    let mut state = load_gate(session).await?;
    let bypass_armed = state.operator_bypass;
    let admitted = state.admit(listing_id, Utc::now(), gate.ttl());
    if bypass_armed {
        save_gate(session, &state).await?;
    }

    if admitted {
        Ok(())
    } else {
        Err(ApiError::new(
            StatusCode::FORBIDDEN,
            "Enter the listing password first",
        ))
    }
}

/// Arms the one-shot operator bypass.
pub async fn arm_operator_bypass(session: &Session) -> ApiResult<()> {
    let mut state = load_gate(session).await?;
    state.arm_operator_bypass();
    save_gate(session, &state).await
}
