//! Berth HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::BerthService;
use crate::domain::{BerthKind, BerthPatch, DomainResult};
use crate::interfaces::http::common::{
    error_response, parse_berth, ApiError, ApiResponse, ValidatedJson,
};

use super::dto::*;

#[derive(Clone)]
pub struct BerthHandlerState {
    pub service: Arc<BerthService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/berths",
    tag = "Berths",
    responses(
        (status = 200, description = "All berths by number", body = ApiResponse<Vec<BerthDto>>)
    )
)]
pub async fn list_berths(
    State(state): State<BerthHandlerState>,
) -> Result<Json<ApiResponse<Vec<BerthDto>>>, ApiError<Vec<BerthDto>>> {
    let berths = state.service.list().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        berths.into_iter().map(BerthDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/berths/{number}",
    tag = "Berths",
    params(("number" = i64, Path, description = "Berth number")),
    responses(
        (status = 200, description = "Berth", body = ApiResponse<BerthDto>),
        (status = 404, description = "Unknown berth"),
        (status = 422, description = "Invalid berth number")
    )
)]
pub async fn get_berth(
    State(state): State<BerthHandlerState>,
    Path(raw): Path<String>,
) -> Result<Json<ApiResponse<BerthDto>>, ApiError<BerthDto>> {
    let number = parse_berth("number", &raw).map_err(error_response)?;
    let berth = state.service.get(number).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(berth.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/berths",
    tag = "Berths",
    request_body = CreateBerthRequest,
    responses(
        (status = 201, description = "Berth created", body = ApiResponse<BerthDto>),
        (status = 409, description = "Berth number already taken"),
        (status = 422, description = "Invalid berth")
    )
)]
pub async fn create_berth(
    State(state): State<BerthHandlerState>,
    ValidatedJson(req): ValidatedJson<CreateBerthRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BerthDto>>), ApiError<BerthDto>> {
    let kind: BerthKind = req.kind.parse().map_err(error_response)?;
    let berth = state
        .service
        .create(req.number, kind, &req.state)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(berth.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/berths/{number}",
    tag = "Berths",
    params(("number" = i64, Path, description = "Berth number")),
    request_body = UpdateBerthRequest,
    responses(
        (status = 200, description = "Berth updated", body = ApiResponse<BerthDto>),
        (status = 404, description = "Unknown berth"),
        (status = 422, description = "Invalid berth number, kind or state")
    )
)]
pub async fn update_berth(
    State(state): State<BerthHandlerState>,
    Path(raw): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateBerthRequest>,
) -> Result<Json<ApiResponse<BerthDto>>, ApiError<BerthDto>> {
    let number = parse_berth("number", &raw).map_err(error_response)?;
    let patch = to_patch(req).map_err(error_response)?;
    let berth = state
        .service
        .update(number, patch)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(berth.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/berths/{number}",
    tag = "Berths",
    params(("number" = i64, Path, description = "Berth number")),
    responses(
        (status = 200, description = "Berth deleted", body = ApiResponse<DeletedBerthResponse>),
        (status = 404, description = "Unknown berth"),
        (status = 409, description = "Berth still has reservations"),
        (status = 422, description = "Invalid berth number")
    )
)]
pub async fn delete_berth(
    State(state): State<BerthHandlerState>,
    Path(raw): Path<String>,
) -> Result<Json<ApiResponse<DeletedBerthResponse>>, ApiError<DeletedBerthResponse>> {
    let number = parse_berth("number", &raw).map_err(error_response)?;
    let berth = state.service.delete(number).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(DeletedBerthResponse {
        deleted: berth.into(),
    })))
}

fn to_patch(req: UpdateBerthRequest) -> DomainResult<BerthPatch> {
    let kind = req.kind.as_deref().map(str::parse::<BerthKind>).transpose()?;
    Ok(BerthPatch {
        kind,
        state: req.state,
    })
}
