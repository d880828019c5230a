//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::{delete, get, post},
    Router,
};
use chrono::Duration;
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, EmptyData};
use super::modules::{admin, auth, health, listings, metrics, search};
use super::session::{create_session_layer, SessionUser};
use crate::application::{AccessGate, IdentityService, ListingService, StatsService};
use crate::config::{AdminSection, AppConfig};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::session_key::derive_cookie_key;
use crate::infrastructure::{ImageStore, OAuthProvider, SeaOrmRepositoryProvider};

/// Shared state for every route
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub listings: Arc<ListingService>,
    pub gate: Arc<AccessGate>,
    pub stats: Arc<StatsService>,
    pub identity: Arc<IdentityService>,
    pub images: Arc<ImageStore>,
    pub admin: Arc<AdminSection>,
    pub started_at: Arc<Instant>,
}

impl AppState {
    /// Wires the services over `db` according to `config`.
    pub fn new(
        db: DatabaseConnection,
        config: &AppConfig,
        oauth: Option<Arc<dyn OAuthProvider>>,
    ) -> Self {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let uploads = &config.uploads;

        Self {
            db,
            listings: Arc::new(ListingService::new(
                repos.clone(),
                config.access_gate.bcrypt_cost,
            )),
            gate: Arc::new(AccessGate::new(
                repos.clone(),
                Duration::minutes(config.access_gate.ttl_minutes),
            )),
            stats: Arc::new(StatsService::new(repos.clone())),
            identity: Arc::new(IdentityService::new(repos, oauth)),
            images: Arc::new(ImageStore::new(
                uploads.dir.clone(),
                uploads.max_width,
                uploads.jpeg_quality,
            )),
            admin: Arc::new(config.admin.clone()),
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Search
        search::home,
        search::search,
        search::search_favorites,
        // Listings
        listings::get_listing,
        listings::create_listing,
        listings::edit_listing_view,
        listings::update_listing,
        listings::delete_listing,
        // Admin
        admin::unlock_listing,
        admin::listing_stats,
        admin::site_stats,
        // Auth
        auth::google_login,
        auth::google_callback,
        auth::logout,
        auth::current_user,
    ),
    components(
        schemas(
            ApiResponse<EmptyData>,
            EmptyData,
            health::HealthResponse,
            health::ComponentHealth,
            search::SearchResponse,
            search::FavoritesResponse,
            listings::ListingDto,
            listings::CreatedListing,
            admin::UnlockRequest,
            admin::UnlockResponse,
            admin::DailyViewDto,
            admin::ListingStatsResponse,
            admin::DailyTotalDto,
            admin::ListingTotalDto,
            admin::SiteStatsResponse,
            SessionUser,
        )
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Search", description = "Home feed, faceted search and favorites"),
        (name = "Listings", description = "Listing details, creation, editing and deletion"),
        (name = "Admin", description = "Listing unlock, per-listing and site statistics"),
        (name = "Authentication", description = "Google sign-in and session management"),
    ),
    info(
        title = "Circles API",
        version = "0.1.0",
        description = "Student club directory: search, listings and view statistics"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    state: AppState,
    config: &AppConfig,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let session_layer =
        create_session_layer(&config.session, derive_cookie_key(&config.session.secret));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let uploads = ServeDir::new(state.images.root());

    let app_routes = Router::new()
        // Search
        .route("/", get(search::home))
        .route("/search", get(search::search))
        .route("/searchFav", get(search::search_favorites))
        // Listings
        .route("/circle/{id}", get(listings::get_listing))
        .route("/circles", post(listings::create_listing))
        .route("/circle/edit/{id}", get(listings::edit_listing_view))
        .route("/circles/edit/{id}", post(listings::update_listing))
        .route("/circle/delete/{id}", delete(listings::delete_listing))
        // Admin
        .route("/circle/admin/{id}/auth", post(admin::unlock_listing))
        .route("/circle/admin/{id}", get(admin::listing_stats))
        .route("/site-stats", get(admin::site_stats))
        // Auth
        .route("/auth/google", get(auth::google_login))
        .route("/auth/google/callback", get(auth::google_callback))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::current_user))
        // Health
        .route("/health", get(health::health_check))
        .route_layer(middleware::from_fn(metrics::http_metrics_middleware))
        .with_state(state);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(app_routes)
        .nest_service(listings::UPLOADS_PATH, uploads);

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(DefaultBodyLimit::max(config.uploads.max_request_bytes()))
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
