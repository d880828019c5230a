//! Home feed, faceted search and favorites lookup

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
