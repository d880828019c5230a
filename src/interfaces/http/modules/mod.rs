pub mod admin;
pub mod auth;
pub mod health;
pub mod listings;
pub mod metrics;
pub mod search;
