//! Reservation repository interface
//!
//! The booking engine only ever reads the reservations of a single berth;
//! whole-collection reads exist for listings.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewReservation, Reservation, ReservationId};
use crate::domain::{BerthNumber, DomainResult};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// All reservations of a berth, ascending by start
    async fn find_by_berth(&self, berth: BerthNumber) -> DomainResult<Vec<Reservation>>;

    /// All reservations of a berth except `exclude`, ascending by start
    async fn find_by_berth_excluding(
        &self,
        berth: BerthNumber,
        exclude: ReservationId,
    ) -> DomainResult<Vec<Reservation>>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: ReservationId) -> DomainResult<Option<Reservation>>;

    /// All reservations, ascending by start
    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;

    /// Reservations whose stay contains `instant`, ascending by end
    async fn find_in_progress(&self, instant: DateTime<Utc>) -> DomainResult<Vec<Reservation>>;

    /// Persist a new reservation; the store assigns the id
    async fn insert(&self, reservation: NewReservation) -> DomainResult<Reservation>;

    /// Overwrite an existing reservation, refreshing `updated_at`
    async fn update_in_place(&self, reservation: Reservation) -> DomainResult<Reservation>;

    /// Delete by id, returning the removed record if it existed
    async fn delete_by_id(&self, id: ReservationId) -> DomainResult<Option<Reservation>>;
}
