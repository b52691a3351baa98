//! Berth CRUD
//!
//! Plain single-record operations. Deletion shares the booking locks so a
//! berth cannot disappear underneath a reservation being written.

use std::sync::Arc;

use tracing::info;

use crate::application::booking::BerthLocks;
use crate::domain::{
    Berth, BerthKind, BerthNumber, BerthPatch, DomainError, DomainResult, NewBerth,
    RepositoryProvider,
};

pub struct BerthService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<BerthLocks>,
}

impl BerthService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: Arc<BerthLocks>) -> Self {
        Self { repos, locks }
    }

    /// All berths ascending by number
    pub async fn list(&self) -> DomainResult<Vec<Berth>> {
        self.repos.berths().find_all().await
    }

    pub async fn get(&self, number: i64) -> DomainResult<Berth> {
        let number = BerthNumber::new(number)?;
        self.repos
            .berths()
            .find_by_number(number)
            .await?
            .ok_or_else(|| not_found(number))
    }

    pub async fn create(&self, number: i64, kind: BerthKind, state: &str) -> DomainResult<Berth> {
        let new = NewBerth::new(BerthNumber::new(number)?, kind, state)?;
        let _guard = self.locks.lock(new.number).await;

        if self.repos.berths().find_by_number(new.number).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!(
                "berth {} already exists",
                new.number
            )));
        }
        let berth = self.repos.berths().insert(new).await?;
        info!(berth = %berth.number, kind = %berth.kind, "⚓ Berth created");
        Ok(berth)
    }

    pub async fn update(&self, number: i64, patch: BerthPatch) -> DomainResult<Berth> {
        let current = self.get(number).await?;
        let next = current.patched(patch)?;
        let saved = self.repos.berths().update(next).await?;
        info!(berth = %saved.number, "Berth updated");
        Ok(saved)
    }

    /// Refused with [`DomainError::InUse`] while reservations reference the berth.
    pub async fn delete(&self, number: i64) -> DomainResult<Berth> {
        let number = BerthNumber::new(number)?;
        let _guard = self.locks.lock(number).await;

        let booked = self.repos.reservations().find_by_berth(number).await?;
        if !booked.is_empty() {
            return Err(DomainError::InUse(format!(
                "berth {} still has {} reservation(s)",
                number,
                booked.len()
            )));
        }
        let deleted = self
            .repos
            .berths()
            .delete(number)
            .await?
            .ok_or_else(|| not_found(number))?;
        info!(berth = %number, "Berth deleted");
        Ok(deleted)
    }
}

fn not_found(number: BerthNumber) -> DomainError {
    DomainError::not_found("Berth", "number", number)
}
