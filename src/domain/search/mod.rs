//! Search criteria for the listing directory.

pub mod filter;

pub use filter::SearchFilter;
