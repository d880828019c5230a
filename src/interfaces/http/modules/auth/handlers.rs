//! Authentication API handlers

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Json;
use tower_sessions::Session;
use tracing::{info, warn};

use super::dto::OAuthCallbackParams;
use crate::domain::DomainError;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult};
use crate::interfaces::http::router::AppState;
use crate::interfaces::http::session::{
    require_user, sign_in, sign_out, store_oauth_state, take_oauth_state, SessionUser,
};

#[utoipa::path(
    get,
    path = "/auth/google",
    tag = "Authentication",
    responses(
        (status = 303, description = "Redirect to Google's consent page"),
        (status = 503, description = "Sign-in not configured")
    )
)]
pub async fn google_login(State(state): State<AppState>, session: Session) -> ApiResult<Redirect> {
    let (url, csrf_state) = state.identity.begin_login()?;
    store_oauth_state(&session, &csrf_state).await?;
    Ok(Redirect::to(&url))
}

#[utoipa::path(
    get,
    path = "/auth/google/callback",
    tag = "Authentication",
    params(OAuthCallbackParams),
    responses(
        (status = 303, description = "Signed in; redirect to the home page"),
        (status = 400, description = "Missing code or state mismatch"),
        (status = 401, description = "Google rejected the sign-in"),
        (status = 503, description = "Sign-in not configured")
    )
)]
pub async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<OAuthCallbackParams>,
) -> ApiResult<Redirect> {
    if !state.identity.is_configured() {
        return Err(DomainError::Unavailable("Sign-in is not configured".into()).into());
    }

    let expected = take_oauth_state(&session).await?;
    if let Some(error) = params.error {
        warn!("Google sign-in declined: {}", error);
        return Err(ApiError::unauthorized("Sign-in was cancelled"));
    }
    match (&expected, &params.state) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => return Err(ApiError::bad_request("Invalid sign-in state")),
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing authorization code"))?;

    let user = state.identity.complete_login(&code).await?;
    sign_in(&session, SessionUser::from(user)).await?;
    Ok(Redirect::to("/"))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Authentication",
    responses((status = 303, description = "Session ended; redirect to the home page"))
)]
pub async fn logout(session: Session) -> ApiResult<Redirect> {
    sign_out(&session).await?;
    info!("👋 Session ended");
    Ok(Redirect::to("/"))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "The signed-in user", body = ApiResponse<SessionUser>),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn current_user(session: Session) -> ApiResult<Json<ApiResponse<SessionUser>>> {
    let user = require_user(&session).await?;
    Ok(Json(ApiResponse::success(user)))
}
