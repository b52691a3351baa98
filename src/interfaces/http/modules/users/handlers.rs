//! User management HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::UserService;
use crate::domain::{DomainResult, UserPatch, UserRole};
use crate::interfaces::http::common::{
    error_response, parse_id, ApiError, ApiResponse, ValidatedJson,
};

use super::dto::*;

#[derive(Clone)]
pub struct UserHandlerState {
    pub service: Arc<UserService>,
}

fn parse_role(raw: Option<&str>) -> DomainResult<Option<UserRole>> {
    raw.map(str::parse::<UserRole>).transpose()
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "Users, newest first", body = ApiResponse<Vec<UserDto>>)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError<Vec<UserDto>>> {
    let users = state.service.list().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError<UserDto>> {
    let id = parse_id("id", &id).map_err(error_response)?;
    let user = state.service.get(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid fields")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError<UserDto>> {
    let role = parse_role(req.role.as_deref()).map_err(error_response)?;
    let user = state
        .service
        .create(&req.name, &req.email, role)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User UUID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError<UserDto>> {
    let id = parse_id("id", &id).map_err(error_response)?;
    let patch = UserPatch {
        name: req.name,
        email: req.email,
        role: parse_role(req.role.as_deref()).map_err(error_response)?,
    };
    let user = state
        .service
        .update(id, patch)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<DeletedUserResponse>),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedUserResponse>>, ApiError<DeletedUserResponse>> {
    let id = parse_id("id", &id).map_err(error_response)?;
    let user = state.service.delete(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(DeletedUserResponse {
        deleted: user.into(),
    })))
}
