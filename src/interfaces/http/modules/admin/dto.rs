//! Admin DTOs

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::Form;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{ListingStats, SiteStats};
use crate::interfaces::http::common::{validation_message, ApiError, ValidatedJson};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UnlockRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Accepts the unlock request as JSON or as an urlencoded form.
pub struct UnlockBody(pub UnlockRequest);

impl<S> FromRequest<S> for UnlockBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if !is_form {
            let ValidatedJson(body) = ValidatedJson::<UnlockRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(body));
        }

        let Form(body) = Form::<UnlockRequest>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()).into_response())?;
        body.validate()
            .map_err(|e| ApiError::bad_request(validation_message(&e)).into_response())?;
        Ok(Self(body))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnlockResponse {
    pub listing_id: i32,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyViewDto {
    pub view_date: NaiveDate,
    pub view_count: i32,
}

/// Listing summary with its recent daily views, oldest first.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingStatsResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub instagram: Option<String>,
    pub daily_views: Vec<DailyViewDto>,
}

impl From<ListingStats> for ListingStatsResponse {
    fn from(stats: ListingStats) -> Self {
        let l = stats.listing;
        Self {
            id: l.id,
            name: l.name,
            description: l.description,
            tags: l.tags,
            instagram: l.instagram,
            daily_views: stats
                .daily_views
                .into_iter()
                .map(|v| DailyViewDto {
                    view_date: v.view_date,
                    view_count: v.view_count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyTotalDto {
    pub view_date: NaiveDate,
    pub total_views: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingTotalDto {
    pub id: i32,
    pub name: String,
    pub main_genre: String,
    pub total_views: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SiteStatsResponse {
    pub total_listings: u64,
    pub total_views: i64,
    /// Ascending by date
    pub views_by_day: Vec<DailyTotalDto>,
    /// Most viewed first
    pub listings: Vec<ListingTotalDto>,
}

impl From<SiteStats> for SiteStatsResponse {
    fn from(stats: SiteStats) -> Self {
        Self {
            total_listings: stats.total_listings,
            total_views: stats.total_views,
            views_by_day: stats
                .views_by_day
                .into_iter()
                .map(|d| DailyTotalDto {
                    view_date: d.view_date,
                    total_views: d.total_views,
                })
                .collect(),
            listings: stats
                .listings
                .into_iter()
                .map(|l| ListingTotalDto {
                    id: l.listing_id,
                    name: l.name,
                    main_genre: l.main_genre,
                    total_views: l.total_views,
                })
                .collect(),
        }
    }
}
