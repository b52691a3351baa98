//! Berth DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Berth;

/// Berth API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BerthDto {
    pub number: i32,
    /// `long` or `short`
    pub kind: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Berth> for BerthDto {
    fn from(b: Berth) -> Self {
        Self {
            number: b.number.get(),
            kind: b.kind.as_str().to_string(),
            state: b.state,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBerthRequest {
    #[validate(range(min = 1, message = "number must be >= 1"))]
    pub number: i64,
    pub kind: String,
    #[validate(length(min = 2, max = 300, message = "state must be 2-300 characters"))]
    pub state: String,
}

/// Partial update; the berth number cannot change.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBerthRequest {
    pub kind: Option<String>,
    #[validate(length(min = 2, max = 300, message = "state must be 2-300 characters"))]
    pub state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedBerthResponse {
    pub deleted: BerthDto,
}
