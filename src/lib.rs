//! # Circles
//!
//! Student club directory: listings with photos and tags, faceted search,
//! per-listing password access for editing and daily view statistics.
//!
//! ## Architecture
//!
//! - **domain**: Listing, user and view types, search filters, repository traits
//! - **application**: Listing, access gate, statistics and identity services
//! - **infrastructure**: SeaORM storage, image store, Google OAuth, crypto
//! - **interfaces**: REST API with Swagger documentation and cookie sessions
//! - **server**: Startup, shutdown and logging

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, AppState};
