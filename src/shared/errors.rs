use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::IntervalRule;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Invalid interval: start {start} must be {} end {end}", .rule.requirement())]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        rule: IntervalRule,
    },

    #[error("Invalid berth number: {0} (expected an integer >= 1)")]
    InvalidBerth(i64),

    #[error("Conflict: berth {berth} is already reserved for this period")]
    Conflict {
        berth: i32,
        conflicting: Option<Uuid>,
    },

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("In use: {0}")]
    InUse(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::Infra(InfraError::Database(e))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Infra(InfraError::Io(e))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Infra(InfraError::Serialization(e))
    }
}
