pub mod model;
pub mod repository;

pub use model::{ExternalProfile, User};
pub use repository::UserRepository;
