//! JSON body extractor that also runs `validator` rules.
//!
//! Malformed bodies and failed rules both answer 400 through [`ApiError`],
//! so clients see the usual `{ "success": false, "error": ... }` envelope.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiError;

/// `Json<T>` whose value has passed `T::validate()`.
///
/// ```ignore
/// async fn unlock(ValidatedJson(body): ValidatedJson<UnlockRequest>) { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

/// One `field: message` entry per failed rule, sorted by field name.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let entries: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();

    if entries.is_empty() {
        "invalid request body".to_string()
    } else {
        entries.join("; ")
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::bad_request(validation_message(&errors)))?;

        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct NewMember {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(range(min = 1, max = 6, message = "year must be 1 to 6"))]
        year: u8,
    }

    async fn join(ValidatedJson(member): ValidatedJson<NewMember>) -> String {
        member.name
    }

    async fn post_json(body: &'static str) -> (StatusCode, serde_json::Value) {
        let app = Router::new().route("/members", post(join));
        let req = Request::builder()
            .method("POST")
            .uri("/members")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn passing_body_reaches_the_handler() {
        let (status, _) = post_json(r#"{"name": "Aiko", "year": 2}"#).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let (status, json) = post_json("{name: Aiko}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn every_failed_rule_is_listed_in_field_order() {
        let (status, json) = post_json(r#"{"name": "", "year": 9}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "name: name is required; year: year must be 1 to 6");
    }
}
