//! Validated query-string extractor
//!
//! Same contract as [`super::ValidatedJson`] for query parameters, except
//! that a query string that does not deserialize (missing field, wrong
//! type) is a 422 too: the client sent the parameters, they are just
//! invalid.

use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use super::validated_json::ValidatedJsonRejection;
use super::ApiResponse;

pub struct ValidatedQuery<T>(pub T);

pub enum ValidatedQueryRejection {
    Malformed(QueryRejection),
    Invalid(validator::ValidationErrors),
}

impl IntoResponse for ValidatedQueryRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Malformed(rejection) => rejection.body_text(),
            Self::Invalid(errors) => ValidatedJsonRejection::describe(&errors),
        };
        debug!(%message, "Query rejected");
        let body = ApiResponse::<()>::error(message);
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedQueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(ValidatedQueryRejection::Malformed)?;

        value.validate().map_err(ValidatedQueryRejection::Invalid)?;

        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Window {
        berth: i64,
        #[validate(length(min = 1, message = "from must not be empty"))]
        from: String,
    }

    async fn handler(ValidatedQuery(q): ValidatedQuery<Window>) -> String {
        format!("{}:{}", q.berth, q.from)
    }

    async fn get_query(query: &str) -> axum::http::Response<Body> {
        let app = Router::new().route("/window", get(handler));
        let req = Request::get(format!("/window?{query}"))
            .body(Body::empty())
            .unwrap();
        app.oneshot(req).await.unwrap()
    }

    async fn envelope(resp: axum::http::Response<Body>) -> ApiResponse<()> {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn well_formed_query_reaches_handler() {
        let resp = get_query("berth=3&from=2025-10-10").await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_type_and_missing_field_are_422_envelopes() {
        for query in ["berth=abc&from=2025-10-10", "berth=3"] {
            let resp = get_query(query).await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{query}");
            let body = envelope(resp).await;
            assert!(!body.success);
            assert!(body.error.is_some());
        }
    }

    #[tokio::test]
    async fn failed_rules_are_422() {
        let resp = get_query("berth=3&from=").await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(envelope(resp).await.error.as_deref(), Some("from: from must not be empty"));
    }
}
