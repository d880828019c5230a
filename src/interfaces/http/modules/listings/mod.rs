//! Listing detail and CRUD

pub mod dto;
pub mod handlers;
pub mod upload;

pub use dto::*;
pub use handlers::*;
