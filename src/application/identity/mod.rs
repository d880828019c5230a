//! Identity module: Google sign-in and user lookup

pub mod service;

pub use service::IdentityService;
