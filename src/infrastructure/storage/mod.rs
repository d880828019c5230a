//! File storage for uploaded listing photos

mod images;

pub use images::{ImageStore, StoredUpload, ALLOWED_EXTENSIONS};
