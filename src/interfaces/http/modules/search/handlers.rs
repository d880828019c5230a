//! Search API handlers

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use super::dto::{FavoritesResponse, SearchResponse};
use crate::domain::SearchFilter;
use crate::interfaces::http::common::{ApiResponse, ApiResult, QueryPairs};
use crate::interfaces::http::router::AppState;
use crate::shared::parse_page;

#[utoipa::path(
    get,
    path = "/",
    tag = "Search",
    params(("page" = Option<u32>, Query, description = "1-based page, default 1")),
    responses(
        (status = 200, description = "Listings in today's order", body = ApiResponse<SearchResponse>)
    )
)]
pub async fn home(
    State(state): State<AppState>,
    query: QueryPairs,
) -> ApiResult<Json<ApiResponse<SearchResponse>>> {
    let page = parse_page(query.first("page"));
    let result = state.listings.home(page, Utc::now().date_naive()).await?;

    let filter = SearchFilter {
        page,
        ..SearchFilter::default()
    };
    Ok(Json(ApiResponse::success(SearchResponse::new(result, filter))))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Search",
    params(
        ("name" = Option<String>, Query, description = "Substring of name, genres, other or location"),
        ("searchGenre" = Option<Vec<String>>, Query, description = "Genre filter; repeat for several"),
        ("bigTag" = Option<Vec<String>>, Query, description = "Tags to rank by; repeat for several"),
        ("page" = Option<u32>, Query, description = "1-based page, default 1")
    ),
    responses(
        (status = 200, description = "Matching listings", body = ApiResponse<SearchResponse>)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    query: QueryPairs,
) -> ApiResult<Json<ApiResponse<SearchResponse>>> {
    let filter = SearchFilter::new(
        query.first("name"),
        query.all("searchGenre"),
        query.all("bigTag"),
        parse_page(query.first("page")),
    );

    let result = state.listings.search(&filter).await?;
    Ok(Json(ApiResponse::success(SearchResponse::new(result, filter))))
}

#[utoipa::path(
    get,
    path = "/searchFav",
    tag = "Search",
    params(("id" = Option<Vec<i32>>, Query, description = "Saved listing ids; repeat for several")),
    responses(
        (status = 200, description = "The saved listings", body = ApiResponse<FavoritesResponse>)
    )
)]
pub async fn search_favorites(
    State(state): State<AppState>,
    query: QueryPairs,
) -> ApiResult<Json<ApiResponse<FavoritesResponse>>> {
    let ids: Vec<i32> = query
        .all("id")
        .into_iter()
        .filter_map(|raw| raw.trim().parse().ok())
        .collect();

    let listings = state.listings.favorites(&ids).await?;
    Ok(Json(ApiResponse::success(FavoritesResponse::new(listings))))
}
