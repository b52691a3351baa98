//! In-memory repository provider for development and testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{
    Berth, BerthNumber, BerthRepository, DomainError, DomainResult, NewBerth, NewReservation,
    NewUser, RepositoryProvider, Reservation, ReservationId, ReservationRepository, User,
    UserRepository,
};

#[derive(Default)]
pub struct InMemoryBerthRepository {
    berths: DashMap<BerthNumber, Berth>,
}

#[derive(Default)]
pub struct InMemoryReservationRepository {
    reservations: DashMap<ReservationId, Reservation>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<Uuid, User>,
}

/// All repositories held in `DashMap`s; nothing survives the process.
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    berths: InMemoryBerthRepository,
    reservations: InMemoryReservationRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
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

#[async_trait]
impl BerthRepository for InMemoryBerthRepository {
    async fn insert(&self, b: NewBerth) -> DomainResult<Berth> {
        use dashmap::mapref::entry::Entry;

        match self.berths.entry(b.number) {
            Entry::Occupied(_) => Err(DomainError::AlreadyExists(format!(
                "berth {} already exists",
                b.number
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let berth = Berth {
                    number: b.number,
                    kind: b.kind,
                    state: b.state,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(berth.clone());
                Ok(berth)
            }
        }
    }

    async fn find_by_number(&self, number: BerthNumber) -> DomainResult<Option<Berth>> {
        Ok(self.berths.get(&number).map(|b| b.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Berth>> {
        let mut all: Vec<Berth> = self.berths.iter().map(|b| b.value().clone()).collect();
        all.sort_by_key(|b| b.number);
        Ok(all)
    }

    async fn update(&self, b: Berth) -> DomainResult<Berth> {
        let mut entry = self
            .berths
            .get_mut(&b.number)
            .ok_or_else(|| DomainError::not_found("Berth", "number", b.number))?;
        entry.kind = b.kind;
        entry.state = b.state;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, number: BerthNumber) -> DomainResult<Option<Berth>> {
        Ok(self.berths.remove(&number).map(|(_, b)| b))
    }
}

impl InMemoryReservationRepository {
    fn collect_sorted<F>(&self, keep: F) -> Vec<Reservation>
    where
        F: Fn(&Reservation) -> bool,
    {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect();
        found.sort_by_key(|r| r.stay.start());
        found
    }
}

#[async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn find_by_berth(&self, berth: BerthNumber) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect_sorted(|r| r.berth_number == berth))
    }

    async fn find_by_berth_excluding(
        &self,
        berth: BerthNumber,
        exclude: ReservationId,
    ) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect_sorted(|r| r.berth_number == berth && r.id != exclude))
    }

    async fn find_by_id(&self, id: ReservationId) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.collect_sorted(|_| true))
    }

    async fn find_in_progress(&self, instant: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        let mut found = self.collect_sorted(|r| r.stay.contains(instant));
        found.sort_by_key(|r| r.stay.end());
        Ok(found)
    }

    async fn insert(&self, r: NewReservation) -> DomainResult<Reservation> {
        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            berth_number: r.berth_number,
            client_name: r.client_name,
            boat_name: r.boat_name,
            stay: r.stay,
            created_at: now,
            updated_at: now,
        };
        self.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn update_in_place(&self, r: Reservation) -> DomainResult<Reservation> {
        let mut entry = self
            .reservations
            .get_mut(&r.id)
            .ok_or_else(|| DomainError::not_found("Reservation", "id", r.id))?;
        let created_at = entry.created_at;
        *entry = Reservation {
            created_at,
            updated_at: Utc::now(),
            ..r
        };
        Ok(entry.clone())
    }

    async fn delete_by_id(&self, id: ReservationId) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.remove(&id).map(|(_, r)| r))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, u: NewUser) -> DomainResult<User> {
        if self.users.iter().any(|existing| existing.email == u.email) {
            return Err(DomainError::AlreadyExists(format!(
                "email {} is already registered",
                u.email
            )));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: u.name,
            email: u.email,
            role: u.role,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let mut all: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn update(&self, u: User) -> DomainResult<User> {
        let mut entry = self
            .users
            .get_mut(&u.id)
            .ok_or_else(|| DomainError::not_found("User", "id", u.id))?;
        entry.name = u.name;
        entry.email = u.email;
        entry.role = u.role;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.users.remove(&id).map(|(_, u)| u))
    }
}
