//! HTTP JSON API
//!
//! - `common`: response envelope, error mapping, extractors
//! - `session`: cookie session layer and the values kept in it
//! - `modules`: request handlers grouped by resource
//! - `router`: route table, shared state and OpenAPI document

pub mod common;
pub mod modules;
pub mod router;
pub mod session;

#[cfg(test)]
mod tests;

pub use router::{create_api_router, ApiDoc, AppState};
