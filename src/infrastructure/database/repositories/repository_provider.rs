//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{BerthRepository, RepositoryProvider, ReservationRepository, UserRepository};

use super::berth_repository::SeaOrmBerthRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let berth = repos.berths().find_by_number(number).await?;
/// let booked = repos.reservations().find_by_berth(number).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    berths: SeaOrmBerthRepository,
    reservations: SeaOrmReservationRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            berths: SeaOrmBerthRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn berths(&self) -> &dyn BerthRepository {
        &self.berths
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
