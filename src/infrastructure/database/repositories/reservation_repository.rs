//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    BerthNumber, DomainError, DomainResult, NewReservation, Reservation, ReservationId,
    ReservationRepository, StayInterval,
};
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let berth_number = BerthNumber::new(i64::from(m.berth_number)).map_err(|_| {
        DomainError::Storage(format!(
            "reservation {} has berth number {}",
            m.id, m.berth_number
        ))
    })?;
    Ok(Reservation {
        id: m.id,
        berth_number,
        client_name: m.client_name,
        boat_name: m.boat_name,
        stay: StayInterval::restore(m.start_date, m.end_date),
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn models_to_domain(models: Vec<reservation::Model>) -> DomainResult<Vec<Reservation>> {
    models.into_iter().map(model_to_domain).collect()
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_by_berth(&self, berth: BerthNumber) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::BerthNumber.eq(berth.get()))
            .order_by_asc(reservation::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_by_berth_excluding(
        &self,
        berth: BerthNumber,
        exclude: ReservationId,
    ) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::BerthNumber.eq(berth.get()))
            .filter(reservation::Column::Id.ne(exclude))
            .order_by_asc(reservation::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_by_id(&self, id: ReservationId) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .order_by_asc(reservation::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn find_in_progress(&self, instant: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::StartDate.lte(instant))
            .filter(reservation::Column::EndDate.gte(instant))
            .order_by_asc(reservation::Column::EndDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models_to_domain(models)
    }

    async fn insert(&self, r: NewReservation) -> DomainResult<Reservation> {
        let id = Uuid::new_v4();
        debug!(reservation_id = %id, berth = %r.berth_number, "Inserting reservation");

        let now = Utc::now();
        let model = reservation::ActiveModel {
            id: Set(id),
            berth_number: Set(r.berth_number.get()),
            client_name: Set(r.client_name),
            boat_name: Set(r.boat_name),
            start_date: Set(r.stay.start()),
            end_date: Set(r.stay.end()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn update_in_place(&self, r: Reservation) -> DomainResult<Reservation> {
        debug!(reservation_id = %r.id, "Updating reservation");

        let existing = reservation::Entity::find_by_id(r.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Reservation", "id", r.id));
        };

        let mut active: reservation::ActiveModel = existing.into();
        active.berth_number = Set(r.berth_number.get());
        active.client_name = Set(r.client_name);
        active.boat_name = Set(r.boat_name);
        active.start_date = Set(r.stay.start());
        active.end_date = Set(r.stay.end());
        active.updated_at = Set(Utc::now());
        let saved = active.update(&self.db).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn delete_by_id(&self, id: ReservationId) -> DomainResult<Option<Reservation>> {
        let existing = reservation::Entity::find_by_id(id)
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
