//! Listing unlock, owner statistics and the operator dashboard

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
