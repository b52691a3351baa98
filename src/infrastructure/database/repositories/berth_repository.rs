//! SeaORM implementation of BerthRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set, SqlErr,
};
use tracing::debug;

use crate::domain::{Berth, BerthNumber, BerthRepository, DomainError, DomainResult, NewBerth};
use crate::infrastructure::database::entities::berth;

pub struct SeaOrmBerthRepository {
    db: DatabaseConnection,
}

impl SeaOrmBerthRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: berth::Model) -> DomainResult<Berth> {
    Ok(Berth {
        number: BerthNumber::new(i64::from(m.number))
            .map_err(|_| DomainError::Storage(format!("stored berth number {}", m.number)))?,
        kind: m
            .kind
            .parse()
            .map_err(|_| DomainError::Storage(format!("stored berth kind '{}'", m.kind)))?,
        state: m.state,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── BerthRepository impl ────────────────────────────────────────

#[async_trait]
impl BerthRepository for SeaOrmBerthRepository {
    async fn insert(&self, b: NewBerth) -> DomainResult<Berth> {
        debug!(berth = %b.number, "Inserting berth");
        let now = Utc::now();
        let model = berth::ActiveModel {
            number: Set(b.number.get()),
            kind: Set(b.kind.as_str().to_string()),
            state: Set(b.state),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::AlreadyExists(format!("berth {} already exists", b.number))
            }
            _ => db_err(e),
        })?;
        model_to_domain(saved)
    }

    async fn find_by_number(&self, number: BerthNumber) -> DomainResult<Option<Berth>> {
        berth::Entity::find_by_id(number.get())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Berth>> {
        berth::Entity::find()
            .order_by_asc(berth::Column::Number)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }

    async fn update(&self, b: Berth) -> DomainResult<Berth> {
        let existing = berth::Entity::find_by_id(b.number.get())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Berth", "number", b.number));
        };

        let mut active: berth::ActiveModel = existing.into();
        active.kind = Set(b.kind.as_str().to_string());
        active.state = Set(b.state);
        active.updated_at = Set(Utc::now());
        let saved = active.update(&self.db).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn delete(&self, number: BerthNumber) -> DomainResult<Option<Berth>> {
        let existing = berth::Entity::find_by_id(number.get())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };
        let removed = model_to_domain(existing.clone())?;
        existing.delete(&self.db).await.map_err(db_err)?;
        Ok(Some(removed))
    }
}
