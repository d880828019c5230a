//! Listing API handlers
//!
//! Detail is public. Creating needs a signed-in user; the edit view,
//! update and delete need an unlocked listing (see the admin module).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tower_sessions::Session;

use super::dto::{CreatedListing, ListingDto};
use super::upload::{compress_uploads, group_by_kind, read_listing_form, to_photos};
use crate::interfaces::http::common::{parse_id, ApiResponse, ApiResult, EmptyData};
use crate::interfaces::http::router::AppState;
use crate::interfaces::http::session::{require_listing_access, require_user};

#[utoipa::path(
    get,
    path = "/circle/{id}",
    tag = "Listings",
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing details; counts one view", body = ApiResponse<ListingDto>),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ListingDto>>> {
    let id = parse_id(&id)?;
    let listing = state.listings.view(id, Utc::now().date_naive()).await?;
    Ok(Json(ApiResponse::success(ListingDto::from(listing))))
}

#[utoipa::path(
    post,
    path = "/circles",
    tag = "Listings",
    request_body(content_type = "multipart/form-data", description = "Listing fields and photos"),
    responses(
        (status = 201, description = "Listing created", body = ApiResponse<CreatedListing>),
        (status = 400, description = "Missing field or bad file"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn create_listing(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<CreatedListing>>)> {
    let user = require_user(&session).await?;
    let form = read_listing_form(&state.images, multipart).await?;

    let compressed = compress_uploads(&state.images, &form.uploads).await;
    state.images.discard(&form.uploads).await;
    let compressed = compressed?;

    let photos = to_photos(&compressed);
    match state
        .listings
        .create(form.submission, photos.clone(), Some(user.id))
        .await
    {
        Ok(id) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(CreatedListing { id })),
        )),
        Err(e) => {
            state.images.remove_files(&photos.all_files()).await;
            Err(e.into())
        }
    }
}

#[utoipa::path(
    get,
    path = "/circle/edit/{id}",
    tag = "Listings",
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing for editing", body = ApiResponse<ListingDto>),
        (status = 403, description = "Listing not unlocked"),
        (status = 404, description = "Not found")
    )
)]
pub async fn edit_listing_view(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ListingDto>>> {
    let id = parse_id(&id)?;
    require_listing_access(&session, &state.gate, id).await?;

    let listing = state.listings.get(id).await?;
    Ok(Json(ApiResponse::success(ListingDto::from(listing))))
}

#[utoipa::path(
    post,
    path = "/circles/edit/{id}",
    tag = "Listings",
    params(("id" = i32, Path, description = "Listing ID")),
    request_body(content_type = "multipart/form-data", description = "Listing fields and photos"),
    responses(
        (status = 200, description = "Listing updated", body = ApiResponse<EmptyData>),
        (status = 400, description = "Missing field or bad file"),
        (status = 403, description = "Listing not unlocked"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_listing(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    let id = parse_id(&id)?;
    require_listing_access(&session, &state.gate, id).await?;
    let form = read_listing_form(&state.images, multipart).await?;

    let compressed = compress_uploads(&state.images, &form.uploads).await;
    state.images.discard(&form.uploads).await;
    let compressed = compressed?;

    let new_files: Vec<String> = compressed.iter().map(|(_, n)| n.clone()).collect();
    match state
        .listings
        .update(id, form.submission, group_by_kind(&compressed))
        .await
    {
        Ok(replaced) => {
            state.images.remove_files(&replaced).await;
            Ok(Json(ApiResponse::success(EmptyData {})))
        }
        Err(e) => {
            state.images.remove_files(&new_files).await;
            Err(e.into())
        }
    }
}

#[utoipa::path(
    delete,
    path = "/circle/delete/{id}",
    tag = "Listings",
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Listing not unlocked"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_listing(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    let id = parse_id(&id)?;
    require_listing_access(&session, &state.gate, id).await?;

    let files = state.listings.delete(id).await?;
    state.images.remove_files(&files).await;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
