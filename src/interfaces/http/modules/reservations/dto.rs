//! Reservation DTOs
//!
//! Dates travel as strings and are parsed by the handlers, so a bad date
//! is reported as a 422 naming the field rather than a JSON syntax error.
//! camelCase aliases accept payloads written for the older catway API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::Availability;
use crate::domain::Reservation;

/// Reservation details in API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    pub berth_number: i32,
    pub client_name: String,
    pub boat_name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id.to_string(),
            berth_number: r.berth_number.get(),
            client_name: r.client_name,
            boat_name: r.boat_name,
            start_date: r.stay.start(),
            end_date: r.stay.end(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Create request. `berth_number` is required on the flat route and
/// ignored on the nested one.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[serde(default, alias = "catwayNumber")]
    pub berth_number: Option<i64>,
    #[serde(alias = "clientName")]
    #[validate(length(min = 2, max = 120, message = "client_name must be 2-120 characters"))]
    pub client_name: String,
    #[serde(alias = "boatName")]
    #[validate(length(min = 1, max = 120, message = "boat_name must be 1-120 characters"))]
    pub boat_name: String,
    /// ISO 8601 date or date-time
    #[serde(alias = "startDate")]
    pub start_date: String,
    /// ISO 8601 date or date-time
    #[serde(alias = "endDate")]
    pub end_date: String,
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateReservationRequest {
    #[serde(default, alias = "catwayNumber")]
    pub berth_number: Option<i64>,
    #[serde(default, alias = "clientName")]
    #[validate(length(min = 2, max = 120, message = "client_name must be 2-120 characters"))]
    pub client_name: Option<String>,
    #[serde(default, alias = "boatName")]
    #[validate(length(min = 1, max = 120, message = "boat_name must be 1-120 characters"))]
    pub boat_name: Option<String>,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    #[serde(alias = "catwayNumber")]
    pub berth_number: i64,
    /// ISO 8601 date or date-time
    #[validate(length(min = 1, message = "start is required"))]
    pub start: String,
    /// ISO 8601 date or date-time
    #[validate(length(min = 1, message = "end is required"))]
    pub end: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityDto {
    pub available: bool,
    pub berth_number: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<Availability> for AvailabilityDto {
    fn from(a: Availability) -> Self {
        Self {
            available: a.available,
            berth_number: a.berth_number.get(),
            start: a.start,
            end: a.end,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedReservationResponse {
    pub deleted: ReservationDto,
}
