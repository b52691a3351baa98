//! Dashboard handler

use std::sync::Arc;

use axum::extract::State;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::ReservationService;
use crate::interfaces::http::common::{error_response, ApiError, ApiResponse};
use crate::interfaces::http::middleware::DemoSession;
use crate::interfaces::http::modules::reservations::ReservationDto;

#[derive(Clone)]
pub struct DashboardState {
    pub reservations: Arc<ReservationService>,
    /// Absolute origin used for links, resolved once at startup
    pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardLinks {
    pub berths: String,
    pub reservations: String,
    pub users: String,
    pub docs: String,
}

impl DashboardLinks {
    fn under(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            berths: format!("{base}/api/v1/berths"),
            reservations: format!("{base}/api/v1/reservations"),
            users: format!("{base}/api/v1/users"),
            docs: format!("{base}/docs"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub today: DateTime<Utc>,
    pub user_email: Option<String>,
    /// Stays that contain `today`, soonest departure first
    pub in_progress: Vec<ReservationDto>,
    pub in_progress_count: usize,
    pub links: DashboardLinks,
}

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Current occupancy summary", body = ApiResponse<DashboardResponse>),
        (status = 401, description = "No session cookie")
    )
)]
pub async fn dashboard(
    State(state): State<DashboardState>,
    Extension(session): Extension<DemoSession>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError<DashboardResponse>> {
    let today = Utc::now();
    let in_progress: Vec<ReservationDto> = state
        .reservations
        .in_progress_at(today)
        .await
        .map_err(error_response)?
        .into_iter()
        .map(ReservationDto::from)
        .collect();

    Ok(Json(ApiResponse::success(DashboardResponse {
        today,
        user_email: session.email,
        in_progress_count: in_progress.len(),
        in_progress,
        links: DashboardLinks::under(&state.base_url),
    })))
}
