//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod oauth;
pub mod storage;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, DatabaseConfig};
pub use oauth::{GoogleProvider, OAuthProvider};
pub use storage::ImageStore;
