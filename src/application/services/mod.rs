//! Application services

pub mod access_gate;
pub mod listing;
mod stats;

pub use access_gate::{AccessGate, GateSession, DEFAULT_GRANT_TTL_MINUTES};
pub use listing::{day_seed, ListingService};
pub use stats::{ListingStats, SiteStats, StatsService, STATS_WINDOW_DAYS};
