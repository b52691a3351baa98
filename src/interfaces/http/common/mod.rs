//! Shared HTTP plumbing: the response envelope, error mapping and the
//! validated extractors.

pub mod validated_json;
pub mod validated_query;

pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::DomainError;

/// Standard API response envelope
///
/// Every REST endpoint wraps its payload in this envelope.
/// On success: `{"success": true, "data": {...}}`,
/// on error: `{"success": false, "data": null, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler's `Result`
pub type ApiError<T> = (StatusCode, Json<ApiResponse<T>>);

/// HTTP status for a domain error. Validation, conflict and not-found
/// failures stay in distinct status classes.
pub fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_)
        | DomainError::InvalidInterval { .. }
        | DomainError::InvalidBerth(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Conflict { .. } | DomainError::AlreadyExists(_) | DomainError::InUse(_) => {
            StatusCode::CONFLICT
        }
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response<T>(e: DomainError) -> ApiError<T> {
    let status = status_for(&e);
    if status.is_server_error() {
        error!(error = %e, "Request failed");
    }
    (status, Json(ApiResponse::error(e.to_string())))
}

/// Parse a path or query identifier, reporting garbage as a validation error.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| DomainError::Validation(format!("{}: '{}' is not a valid id", field, raw)))
}

/// Parse a berth number taken from the path.
pub fn parse_berth(field: &str, raw: &str) -> Result<i64, DomainError> {
    raw.trim().parse::<i64>().map_err(|_| {
        DomainError::Validation(format!("{}: '{}' is not a valid berth number", field, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IntervalRule;
    use chrono::Utc;

    #[test]
    fn taxonomy_maps_to_distinct_statuses() {
        let now = Utc::now();
        assert_eq!(
            status_for(&DomainError::not_found("Reservation", "id", "x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DomainError::InvalidInterval {
                start: now,
                end: now,
                rule: IntervalRule::Strict,
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&DomainError::InvalidBerth(0)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&DomainError::Conflict {
                berth: 1,
                conflicting: None
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DomainError::InUse("berth 1".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&DomainError::Unauthorized("login".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&DomainError::Storage("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn bad_ids_are_validation_errors() {
        assert!(parse_id("id", &Uuid::new_v4().to_string()).is_ok());
        assert!(matches!(
            parse_id("id", "abc"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn bad_berth_numbers_are_validation_errors() {
        assert_eq!(parse_berth("number", " 12 ").unwrap(), 12);
        for raw in ["abc", "", "1.5", "99999999999999999999"] {
            assert!(matches!(
                parse_berth("number", raw),
                Err(DomainError::Validation(_))
            ));
        }
    }

    #[test]
    fn envelope_omits_error_on_success() {
        let json = serde_json::to_value(ApiResponse::success(3)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 3}));
        let json = serde_json::to_value(ApiResponse::<i32>::error("nope")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "data": null, "error": "nope"})
        );
    }
}
