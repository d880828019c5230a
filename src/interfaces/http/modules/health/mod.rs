//! Liveness endpoint with a database ping

pub mod handlers;

pub use handlers::*;
