//! Shared HTTP types: response envelope, error mapping, extractors

mod error;
mod query;
mod response;
mod validated_json;

pub use error::{ApiError, ApiResult};
pub use query::{parse_id, QueryPairs};
pub use response::{ApiResponse, EmptyData};
pub use validated_json::{validation_message, ValidatedJson};
