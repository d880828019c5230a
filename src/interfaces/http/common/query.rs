//! Query-string helpers
//!
//! Several search parameters may be sent once (`?bigTag=a`), repeated
//! (`?bigTag=a&bigTag=b`) or in bracket form (`?bigTag[]=a`). `QueryPairs`
//! keeps every pair so handlers can read all of them.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use super::ApiError;

/// Every `key=value` pair of the query string, in order.
#[derive(Debug, Default, Clone)]
pub struct QueryPairs(pub Vec<(String, String)>);

impl QueryPairs {
    fn matches(key: &str, wanted: &str) -> bool {
        key == wanted || key.strip_suffix("[]") == Some(wanted)
    }

    /// First value for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| Self::matches(k, key))
            .map(|(_, v)| v.as_str())
    }

    /// All values for `key`, including `key[]`.
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| Self::matches(k, key))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::bad_request(format!("Invalid query string: {}", e)))?;
        Ok(Self(pairs))
    }
}

/// Parses a listing id path segment.
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::bad_request(format!("Invalid listing id '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> QueryPairs {
        QueryPairs(
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn repeated_and_bracketed_keys_are_collected() {
        let q = pairs(&[("bigTag", "a"), ("name", "x"), ("bigTag[]", "b")]);
        assert_eq!(q.all("bigTag"), vec!["a", "b"]);
        assert_eq!(q.first("name"), Some("x"));
        assert_eq!(q.first("page"), None);
        assert!(q.all("searchGenre").is_empty());
    }

    #[test]
    fn ids_must_be_numeric() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert_eq!(parse_id("abc").unwrap_err().status, axum::http::StatusCode::BAD_REQUEST);
        assert!(parse_id("1.5").is_err());
    }
}
