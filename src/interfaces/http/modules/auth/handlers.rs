//! Auth HTTP handlers

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use tracing::info;

use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::SessionConfig;

use super::dto::*;

#[derive(Clone)]
pub struct AuthHandlerState {
    pub session: SessionConfig,
}

/// Demo login: sets the token and email cookies.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookies set", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Malformed JSON"),
        (status = 422, description = "Missing email or password")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> impl IntoResponse {
    let email = req.email.trim().to_string();
    info!(email = %email, "Demo login");

    let cookies = AppendHeaders([
        (SET_COOKIE, state.session.token_cookie()),
        (SET_COOKIE, state.session.email_cookie(&email)),
    ]);
    let body = ApiResponse::success(LoginResponse {
        email,
        expires_in: state.session.max_age_secs,
    });
    (cookies, Json(body))
}

/// Clears both session cookies.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session cookies cleared", body = ApiResponse<LogoutResponse>)
    )
)]
pub async fn logout(State(state): State<AuthHandlerState>) -> impl IntoResponse {
    let [token, email] = state.session.clearing_cookies();
    (
        AppendHeaders([(SET_COOKIE, token), (SET_COOKIE, email)]),
        Json(ApiResponse::success(LogoutResponse { logged_out: true })),
    )
}
