use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn listing_not_found(id: i32) -> Self {
        DomainError::NotFound {
            entity: "Listing",
            field: "id",
            value: id.to_string(),
        }
    }

    /// Whether the failure came from the storage layer rather than the caller.
    pub fn is_internal(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_listing() {
        let err = DomainError::listing_not_found(42);
        assert_eq!(err.to_string(), "Not found: Listing with id=42");
        assert!(!err.is_internal());
    }

    #[test]
    fn storage_errors_are_internal() {
        assert!(DomainError::Storage("disk full".into()).is_internal());
        assert!(!DomainError::Validation("bad".into()).is_internal());
    }
}
