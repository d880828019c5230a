//! Admin API handlers

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use tower_sessions::Session;
use tracing::info;

use super::dto::{ListingStatsResponse, SiteStatsResponse, UnlockBody, UnlockRequest, UnlockResponse};
use crate::interfaces::http::common::{parse_id, ApiError, ApiResponse, ApiResult};
use crate::interfaces::http::router::AppState;
use crate::interfaces::http::session::{
    arm_operator_bypass, grant_listing, require_listing_access, require_user,
};

#[utoipa::path(
    post,
    path = "/circle/admin/{id}/auth",
    tag = "Admin",
    params(("id" = i32, Path, description = "Listing ID")),
    request_body = UnlockRequest,
    responses(
        (status = 200, description = "Listing unlocked for this session", body = ApiResponse<UnlockResponse>),
        (status = 400, description = "Missing password or invalid id"),
        (status = 403, description = "Wrong password"),
        (status = 404, description = "Not found")
    )
)]
pub async fn unlock_listing(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    UnlockBody(body): UnlockBody,
) -> ApiResult<Json<ApiResponse<UnlockResponse>>> {
    let id = parse_id(&id)?;
    state.gate.verify(id, &body.password).await?;
    grant_listing(&session, &state.gate, id).await?;

    Ok(Json(ApiResponse::success(UnlockResponse {
        listing_id: id,
        expires_at: Utc::now() + state.gate.ttl(),
    })))
}

#[utoipa::path(
    get,
    path = "/circle/admin/{id}",
    tag = "Admin",
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Daily views of the last 15 days", body = ApiResponse<ListingStatsResponse>),
        (status = 403, description = "Listing not unlocked"),
        (status = 404, description = "Not found")
    )
)]
pub async fn listing_stats(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ListingStatsResponse>>> {
    let id = parse_id(&id)?;
    require_listing_access(&session, &state.gate, id).await?;

    let stats = state.stats.listing_stats(id, Utc::now().date_naive()).await?;
    // opening the stats page renews the grant
    grant_listing(&session, &state.gate, id).await?;

    Ok(Json(ApiResponse::success(ListingStatsResponse::from(stats))))
}

#[utoipa::path(
    get,
    path = "/site-stats",
    tag = "Admin",
    responses(
        (status = 200, description = "Site-wide view statistics", body = ApiResponse<SiteStatsResponse>),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an operator")
    )
)]
pub async fn site_stats(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<ApiResponse<SiteStatsResponse>>> {
    let user = require_user(&session).await?;
    if !state.admin.is_operator(user.email.as_deref()) {
        return Err(ApiError::forbidden("Operators only"));
    }

    let stats = state.stats.site_stats().await?;
    arm_operator_bypass(&session).await?;
    info!(user_id = %user.id, "📈 Site dashboard opened");

    Ok(Json(ApiResponse::success(SiteStatsResponse::from(stats))))
}
