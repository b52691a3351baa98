//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` deserializes like `axum::Json<T>` and then runs
//! `validator::Validate::validate()`. Malformed JSON is answered with 400,
//! a body that parses but fails validation with 422.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use super::ApiResponse;

/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateBerthRequest {
///     #[validate(range(min = 1))]
///     number: i64,
///     #[validate(length(min = 2, max = 300))]
///     state: String,
/// }
///
/// async fn handler(ValidatedJson(body): ValidatedJson<CreateBerthRequest>) { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Malformed(JsonRejection),
    Invalid(validator::ValidationErrors),
}

impl ValidatedJsonRejection {
    pub(super) fn describe(errors: &validator::ValidationErrors) -> String {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, msg)
                })
            })
            .collect();
        fields.sort();

        if fields.is_empty() {
            "Validation failed".to_string()
        } else {
            fields.join("; ")
        }
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Malformed(rejection) => {
                let body = ApiResponse::<()>::error(format!("Invalid JSON: {}", rejection.body_text()));
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Invalid(errors) => {
                let message = Self::describe(&errors);
                debug!(%message, "Request body rejected");
                let body = ApiResponse::<()>::error(message);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Malformed)?;

        value.validate().map_err(ValidatedJsonRejection::Invalid)?;

        Ok(ValidatedJson(value))
    }
}
