//! Google sign-in, sign-out and the current user

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
