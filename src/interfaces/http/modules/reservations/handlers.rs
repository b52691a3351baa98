//! Reservation HTTP handlers
//!
//! Flat routes (`/api/v1/reservations/...`) and berth-nested routes
//! (`/api/v1/berths/{number}/reservations/...`) share one implementation
//! and differ only in the [`BerthScope`] handed to the service.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::{BerthScope, CreateReservation, ReservationService};
use crate::domain::{BerthNumber, DomainResult, ReservationPatch};
use crate::interfaces::http::common::{
    error_response, parse_berth, parse_id, ApiError, ApiResponse, ValidatedJson, ValidatedQuery,
};
use crate::shared::time::parse_instant;

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationHandlerState {
    pub service: Arc<ReservationService>,
}

type Single = Result<Json<ApiResponse<ReservationDto>>, ApiError<ReservationDto>>;
type Many = Result<Json<ApiResponse<Vec<ReservationDto>>>, ApiError<Vec<ReservationDto>>>;
type Created =
    Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError<ReservationDto>>;
type Deleted =
    Result<Json<ApiResponse<DeletedReservationResponse>>, ApiError<DeletedReservationResponse>>;

// ── shared implementation ─────────────────────────────────────────

async fn list(state: &ReservationHandlerState, scope: BerthScope) -> Many {
    let found = state.service.list(scope).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        found.into_iter().map(ReservationDto::from).collect(),
    )))
}

async fn get(state: &ReservationHandlerState, scope: BerthScope, raw_id: &str) -> Single {
    let id = parse_id("id", raw_id).map_err(error_response)?;
    let found = state.service.get(scope, id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(found.into())))
}

async fn create(
    state: &ReservationHandlerState,
    scope: BerthScope,
    req: CreateReservationRequest,
) -> Created {
    let input = to_create(req).map_err(error_response)?;
    let created = state
        .service
        .create(scope, input)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created.into()))))
}

async fn update(
    state: &ReservationHandlerState,
    scope: BerthScope,
    raw_id: &str,
    req: UpdateReservationRequest,
) -> Single {
    let id = parse_id("id", raw_id).map_err(error_response)?;
    let patch = to_patch(req).map_err(error_response)?;
    let updated = state
        .service
        .update(scope, id, patch)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(updated.into())))
}

async fn delete(state: &ReservationHandlerState, scope: BerthScope, raw_id: &str) -> Deleted {
    let id = parse_id("id", raw_id).map_err(error_response)?;
    let deleted = state
        .service
        .delete(scope, id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(DeletedReservationResponse {
        deleted: deleted.into(),
    })))
}

fn to_create(req: CreateReservationRequest) -> DomainResult<CreateReservation> {
    Ok(CreateReservation {
        berth_number: req.berth_number,
        client_name: req.client_name,
        boat_name: req.boat_name,
        start: parse_instant("start_date", &req.start_date)?,
        end: parse_instant("end_date", &req.end_date)?,
    })
}

fn to_patch(req: UpdateReservationRequest) -> DomainResult<ReservationPatch> {
    Ok(ReservationPatch {
        berth_number: req.berth_number.map(BerthNumber::new).transpose()?,
        client_name: req.client_name,
        boat_name: req.boat_name,
        start: req
            .start_date
            .as_deref()
            .map(|raw| parse_instant("start_date", raw))
            .transpose()?,
        end: req
            .end_date
            .as_deref()
            .map(|raw| parse_instant("end_date", raw))
            .transpose()?,
    })
}

// ── flat routes ───────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    responses(
        (status = 200, description = "All reservations by start date", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn list_reservations(State(state): State<ReservationHandlerState>) -> Many {
    list(&state, BerthScope::Any).await
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation UUID")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Malformed id")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<String>,
) -> Single {
    get(&state, BerthScope::Any, &id).await
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Unknown berth"),
        (status = 409, description = "Overlaps an existing reservation"),
        (status = 422, description = "Invalid fields or date range")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationHandlerState>,
    ValidatedJson(req): ValidatedJson<CreateReservationRequest>,
) -> Created {
    create(&state, BerthScope::Any, req).await
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation UUID")),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation or target berth not found"),
        (status = 409, description = "Overlaps another reservation"),
        (status = 422, description = "Invalid fields or date range")
    )
)]
pub async fn update_reservation(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateReservationRequest>,
) -> Single {
    update(&state, BerthScope::Any, &id, req).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation UUID")),
    responses(
        (status = 200, description = "Reservation deleted", body = ApiResponse<DeletedReservationResponse>),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn delete_reservation(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<String>,
) -> Deleted {
    delete(&state, BerthScope::Any, &id).await
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/availability",
    tag = "Reservations",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Whether the range is free on the berth", body = ApiResponse<AvailabilityDto>),
        (status = 422, description = "Missing or invalid berth or date range")
    )
)]
pub async fn check_availability(
    State(state): State<ReservationHandlerState>,
    ValidatedQuery(query): ValidatedQuery<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityDto>>, ApiError<AvailabilityDto>> {
    let start = parse_instant("start", &query.start).map_err(error_response)?;
    let end = parse_instant("end", &query.end).map_err(error_response)?;
    let availability = state
        .service
        .availability(query.berth_number, start, end)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(availability.into())))
}

// ── berth-nested routes ───────────────────────────────────────────

fn nested<T>(raw: &str) -> Result<BerthScope, ApiError<T>> {
    parse_berth("number", raw)
        .map(BerthScope::Berth)
        .map_err(error_response)
}

#[utoipa::path(
    get,
    path = "/api/v1/berths/{number}/reservations",
    tag = "Reservations",
    params(("number" = i64, Path, description = "Berth number")),
    responses(
        (status = 200, description = "Reservations of the berth by start date", body = ApiResponse<Vec<ReservationDto>>),
        (status = 422, description = "Invalid berth number")
    )
)]
pub async fn list_berth_reservations(
    State(state): State<ReservationHandlerState>,
    Path(raw): Path<String>,
) -> Many {
    list(&state, nested(&raw)?).await
}

#[utoipa::path(
    get,
    path = "/api/v1/berths/{number}/reservations/{id}",
    tag = "Reservations",
    params(
        ("number" = i64, Path, description = "Berth number"),
        ("id" = String, Path, description = "Reservation UUID")
    ),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 404, description = "No such reservation on this berth")
    )
)]
pub async fn get_berth_reservation(
    State(state): State<ReservationHandlerState>,
    Path((raw, id)): Path<(String, String)>,
) -> Single {
    get(&state, nested(&raw)?, &id).await
}

#[utoipa::path(
    post,
    path = "/api/v1/berths/{number}/reservations",
    tag = "Reservations",
    params(("number" = i64, Path, description = "Berth number")),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Unknown berth"),
        (status = 409, description = "Overlaps an existing reservation"),
        (status = 422, description = "Invalid fields or date range")
    )
)]
pub async fn create_berth_reservation(
    State(state): State<ReservationHandlerState>,
    Path(raw): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateReservationRequest>,
) -> Created {
    create(&state, nested(&raw)?, req).await
}

#[utoipa::path(
    put,
    path = "/api/v1/berths/{number}/reservations/{id}",
    tag = "Reservations",
    params(
        ("number" = i64, Path, description = "Berth number"),
        ("id" = String, Path, description = "Reservation UUID")
    ),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<ReservationDto>),
        (status = 404, description = "No such reservation on this berth"),
        (status = 409, description = "Overlaps another reservation"),
        (status = 422, description = "Invalid fields or date range")
    )
)]
pub async fn update_berth_reservation(
    State(state): State<ReservationHandlerState>,
    Path((raw, id)): Path<(String, String)>,
    ValidatedJson(req): ValidatedJson<UpdateReservationRequest>,
) -> Single {
    update(&state, nested(&raw)?, &id, req).await
}

#[utoipa::path(
    delete,
    path = "/api/v1/berths/{number}/reservations/{id}",
    tag = "Reservations",
    params(
        ("number" = i64, Path, description = "Berth number"),
        ("id" = String, Path, description = "Reservation UUID")
    ),
    responses(
        (status = 200, description = "Reservation deleted", body = ApiResponse<DeletedReservationResponse>),
        (status = 404, description = "No such reservation on this berth")
    )
)]
pub async fn delete_berth_reservation(
    State(state): State<ReservationHandlerState>,
    Path((raw, id)): Path<(String, String)>,
) -> Deleted {
    delete(&state, nested(&raw)?, &id).await
}
