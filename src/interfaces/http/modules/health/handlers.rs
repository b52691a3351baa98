//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    /// `None` when running on the in-memory store
    pub db: Option<DatabaseConnection>,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub uptime_seconds: u64,
    /// `ok`, `error` or `memory`
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match &state.db {
        None => "memory",
        Some(db) => {
            let ping = db
                .execute(Statement::from_string(
                    db.get_database_backend(),
                    "SELECT 1".to_string(),
                ))
                .await;
            match ping {
                Ok(_) => "ok",
                Err(e) => {
                    tracing::warn!(error = %e, "Health check database ping failed");
                    "error"
                }
            }
        }
    };

    let ok = database != "error";
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            ok,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database: database.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_reports_ok() {
        let state = HealthState {
            db: None,
            started_at: Arc::new(Instant::now()),
        };
        let (status, Json(body)) = health_check(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.ok);
        assert_eq!(body.database, "memory");
    }

    #[tokio::test]
    async fn sqlite_ping_succeeds() {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        let state = HealthState {
            db: Some(db),
            started_at: Arc::new(Instant::now()),
        };
        let (status, Json(body)) = health_check(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.database, "ok");
    }
}
