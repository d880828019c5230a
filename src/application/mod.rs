//! Application layer: use-cases over the domain repositories

pub mod identity;
pub mod services;

pub use identity::IdentityService;
pub use services::{
    AccessGate, GateSession, ListingService, ListingStats, SiteStats, StatsService,
};
