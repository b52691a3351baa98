//! Reservation use-cases
//!
//! Every write goes through [`ConflictEngine`] while holding the berth
//! lock(s) from [`BerthLocks`], so the no-overlap invariant holds at rest
//! even under concurrent requests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::conflict::{ConflictEngine, ConflictOutcome};
use super::locks::BerthLocks;
use crate::domain::{
    BerthNumber, DomainError, DomainResult, IntervalRule, NewReservation, RepositoryProvider,
    Reservation, ReservationId, ReservationPatch, StayInterval,
};

/// How a reservation was addressed: directly, or as a child of a berth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BerthScope {
    Any,
    Berth(i64),
}

impl BerthScope {
    /// The berth claimed by the path, validated.
    pub fn berth(&self) -> DomainResult<Option<BerthNumber>> {
        match *self {
            Self::Any => Ok(None),
            Self::Berth(raw) => BerthNumber::new(raw).map(Some),
        }
    }

    /// A reservation reached through another berth's path does not exist there.
    pub fn guard(&self, reservation: Reservation) -> DomainResult<Reservation> {
        match self.berth()? {
            Some(berth) if berth != reservation.berth_number => Err(not_found(reservation.id)),
            _ => Ok(reservation),
        }
    }
}

/// Create input as received from the request layer
#[derive(Debug, Clone)]
pub struct CreateReservation {
    /// Ignored when the scope names a berth
    pub berth_number: Option<i64>,
    pub client_name: String,
    pub boat_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Answer to an availability query
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub available: bool,
    pub berth_number: BerthNumber,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<BerthLocks>,
    rule: IntervalRule,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: Arc<BerthLocks>, rule: IntervalRule) -> Self {
        Self { repos, locks, rule }
    }

    pub fn rule(&self) -> IntervalRule {
        self.rule
    }

    fn engine(&self) -> ConflictEngine<'_> {
        ConflictEngine::new(self.repos.reservations(), self.rule)
    }

    /// All reservations ascending by start; nested scope keeps one berth.
    pub async fn list(&self, scope: BerthScope) -> DomainResult<Vec<Reservation>> {
        match scope.berth()? {
            None => self.repos.reservations().find_all().await,
            Some(berth) => self.repos.reservations().find_by_berth(berth).await,
        }
    }

    pub async fn get(&self, scope: BerthScope, id: ReservationId) -> DomainResult<Reservation> {
        let reservation = self
            .repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        scope.guard(reservation)
    }

    pub async fn create(
        &self,
        scope: BerthScope,
        input: CreateReservation,
    ) -> DomainResult<Reservation> {
        let raw_berth = match scope {
            BerthScope::Berth(raw) => raw,
            BerthScope::Any => input
                .berth_number
                .ok_or_else(|| DomainError::Validation("berth_number is required".into()))?,
        };
        let stay = StayInterval::new(input.start, input.end, self.rule)?;
        let berth = BerthNumber::new(raw_berth)?;
        let new = NewReservation::new(berth, &input.client_name, &input.boat_name, stay)?;

        let _guard = self.locks.lock(berth).await;
        self.ensure_berth(berth).await?;

        let outcome = self
            .engine()
            .check_for_create(raw_berth, input.start, input.end)
            .await?;
        record_conflict(&outcome, "create");
        outcome.into_result(berth)?;

        let created = self.repos.reservations().insert(new).await?;
        metrics::counter!("marina_reservations_created_total").increment(1);
        info!(
            reservation_id = %created.id,
            berth = %created.berth_number,
            stay = %created.stay,
            "📅 Reservation created"
        );
        Ok(created)
    }

    /// Merge `patch` onto the stored record and re-check it against the
    /// other reservations of its (possibly new) berth.
    pub async fn update(
        &self,
        scope: BerthScope,
        id: ReservationId,
        mut patch: ReservationPatch,
    ) -> DomainResult<Reservation> {
        if let Some(berth) = scope.berth()? {
            patch.berth_number = Some(berth);
        }

        // Lock source and target, then confirm the record did not move
        // to another berth while we were waiting.
        let (current, _guard) = loop {
            let seen = self.get(scope, id).await?;
            let target = patch.berth_number.unwrap_or(seen.berth_number);
            let guard = self.locks.lock_pair(seen.berth_number, target).await;
            let current = self.get(scope, id).await?;
            if current.berth_number == seen.berth_number {
                break (current, guard);
            }
        };

        let next = patch.apply(&current, self.rule)?;
        if next.berth_number != current.berth_number {
            self.ensure_berth(next.berth_number).await?;
        }

        let outcome = self
            .engine()
            .check_for_update(
                id,
                next.berth_number.into(),
                next.stay.start(),
                next.stay.end(),
            )
            .await?;
        record_conflict(&outcome, "update");
        outcome.into_result(next.berth_number)?;

        let saved = self.repos.reservations().update_in_place(next).await?;
        info!(
            reservation_id = %saved.id,
            berth = %saved.berth_number,
            stay = %saved.stay,
            "✏️ Reservation updated"
        );
        Ok(saved)
    }

    /// Removing a stay cannot create an overlap, so no check runs.
    pub async fn delete(&self, scope: BerthScope, id: ReservationId) -> DomainResult<Reservation> {
        self.get(scope, id).await?;
        let deleted = self
            .repos
            .reservations()
            .delete_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(reservation_id = %id, berth = %deleted.berth_number, "🗑️ Reservation deleted");
        Ok(deleted)
    }

    /// Pre-flight check; never writes and takes no lock.
    pub async fn availability(
        &self,
        berth: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Availability> {
        let available = self.engine().check_availability(berth, start, end).await?;
        let label = if available { "true" } else { "false" };
        metrics::counter!("marina_availability_checks_total", "available" => label).increment(1);
        Ok(Availability {
            available,
            berth_number: BerthNumber::new(berth)?,
            start,
            end,
        })
    }

    /// Reservations whose stay contains `instant`, ascending by end
    pub async fn in_progress_at(&self, instant: DateTime<Utc>) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_in_progress(instant).await
    }

    async fn ensure_berth(&self, berth: BerthNumber) -> DomainResult<()> {
        match self.repos.berths().find_by_number(berth).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Berth", "number", berth)),
        }
    }
}

fn not_found(id: ReservationId) -> DomainError {
    DomainError::not_found("Reservation", "id", id)
}

fn record_conflict(outcome: &ConflictOutcome, operation: &'static str) {
    if !outcome.is_clear() {
        metrics::counter!("marina_reservation_conflicts_total", "operation" => operation)
            .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BerthKind, NewBerth};
    use crate::infrastructure::memory::InMemoryRepositoryProvider;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, d, 0, 0, 0).unwrap()
    }

    async fn service_with_berths(numbers: &[i64], rule: IntervalRule) -> ReservationService {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        for &n in numbers {
            let number = BerthNumber::new(n).unwrap();
            repos
                .berths()
                .insert(NewBerth::new(number, BerthKind::Short, "ok").unwrap())
                .await
                .unwrap();
        }
        ReservationService::new(repos, Arc::new(BerthLocks::new()), rule)
    }

    fn booking(berth: Option<i64>, from: u32, to: u32) -> CreateReservation {
        CreateReservation {
            berth_number: berth,
            client_name: "Marie Curie".into(),
            boat_name: "Polonium".into(),
            start: day(from),
            end: day(to),
        }
    }

    #[tokio::test]
    async fn create_then_overlap_is_conflict() {
        let svc = service_with_berths(&[1], IntervalRule::Inclusive).await;
        let first = svc.create(BerthScope::Any, booking(Some(1), 10, 12)).await.unwrap();

        let err = svc
            .create(BerthScope::Any, booking(Some(1), 12, 14))
            .await
            .unwrap_err();
        match err {
            DomainError::Conflict { berth, conflicting } => {
                assert_eq!(berth, 1);
                assert_eq!(conflicting, Some(first.id));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
        assert!(svc.create(BerthScope::Any, booking(Some(1), 13, 15)).await.is_ok());
    }

    #[tokio::test]
    async fn nested_create_takes_berth_from_path() {
        let svc = service_with_berths(&[1, 2], IntervalRule::Inclusive).await;
        let created = svc
            .create(BerthScope::Berth(2), booking(Some(1), 10, 12))
            .await
            .unwrap();
        assert_eq!(created.berth_number.get(), 2);
    }

    #[tokio::test]
    async fn flat_create_requires_berth() {
        let svc = service_with_berths(&[1], IntervalRule::Inclusive).await;
        let err = svc.create(BerthScope::Any, booking(None, 10, 12)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_on_unknown_berth_is_not_found() {
        let svc = service_with_berths(&[1], IntervalRule::Inclusive).await;
        let err = svc
            .create(BerthScope::Any, booking(Some(9), 10, 12))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Berth", .. }));
    }

    #[tokio::test]
    async fn rejected_writes_leave_no_locks_behind() {
        let svc = service_with_berths(&[1], IntervalRule::Inclusive).await;
        for n in 100..1100 {
            assert!(svc.create(BerthScope::Berth(n), booking(None, 10, 12)).await.is_err());
        }
        assert!(svc.locks.is_empty());

        let r = svc.create(BerthScope::Any, booking(Some(1), 10, 12)).await.unwrap();
        for n in 100..200 {
            let patch = ReservationPatch {
                berth_number: Some(BerthNumber::new(n).unwrap()),
                ..Default::default()
            };
            assert!(svc.update(BerthScope::Any, r.id, patch).await.is_err());
        }
        assert!(svc.locks.is_empty());
    }

    #[tokio::test]
    async fn create_reports_invalid_interval_before_berth() {
        let svc = service_with_berths(&[], IntervalRule::Inclusive).await;
        let err = svc
            .create(BerthScope::Any, booking(Some(0), 12, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInterval { .. }));
    }

    #[tokio::test]
    async fn strict_rule_rejects_zero_length_stay() {
        let strict = service_with_berths(&[1], IntervalRule::Strict).await;
        let inclusive = service_with_berths(&[1], IntervalRule::Inclusive).await;
        assert!(matches!(
            strict.create(BerthScope::Any, booking(Some(1), 10, 10)).await,
            Err(DomainError::InvalidInterval { .. })
        ));
        assert!(inclusive.create(BerthScope::Any, booking(Some(1), 10, 10)).await.is_ok());
    }

    #[tokio::test]
    async fn update_to_same_interval_succeeds() {
        let svc = service_with_berths(&[1], IntervalRule::Inclusive).await;
        let r = svc.create(BerthScope::Any, booking(Some(1), 10, 12)).await.unwrap();

        let patch = ReservationPatch {
            start: Some(day(10)),
            end: Some(day(12)),
            ..Default::default()
        };
        let updated = svc.update(BerthScope::Any, r.id, patch).await.unwrap();
        assert_eq!(updated.stay, r.stay);
    }

    #[tokio::test]
    async fn update_into_neighbour_conflicts() {
        let svc = service_with_berths(&[1], IntervalRule::Inclusive).await;
        let a = svc.create(BerthScope::Any, booking(Some(1), 10, 12)).await.unwrap();
        let b = svc.create(BerthScope::Any, booking(Some(1), 20, 22)).await.unwrap();

        let patch = ReservationPatch {
            end: Some(day(20)),
            ..Default::default()
        };
        let err = svc.update(BerthScope::Any, a.id, patch).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { conflicting: Some(id), .. } if id == b.id));
        assert_eq!(svc.get(BerthScope::Any, a.id).await.unwrap().stay, a.stay);
    }

    #[tokio::test]
    async fn update_can_move_to_free_berth() {
        let svc = service_with_berths(&[1, 2], IntervalRule::Inclusive).await;
        let a = svc.create(BerthScope::Any, booking(Some(1), 10, 12)).await.unwrap();
        svc.create(BerthScope::Any, booking(Some(2), 1, 3)).await.unwrap();

        let patch = ReservationPatch {
            berth_number: Some(BerthNumber::new(2).unwrap()),
            ..Default::default()
        };
        let moved = svc.update(BerthScope::Any, a.id, patch).await.unwrap();
        assert_eq!(moved.berth_number.get(), 2);
        assert!(svc.list(BerthScope::Berth(1)).await.unwrap().is_empty());
        assert_eq!(svc.list(BerthScope::Berth(2)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn nested_path_berth_overrides_body() {
        let svc = service_with_berths(&[1, 2], IntervalRule::Inclusive).await;
        let a = svc.create(BerthScope::Any, booking(Some(1), 10, 12)).await.unwrap();

        let patch = ReservationPatch {
            berth_number: Some(BerthNumber::new(2).unwrap()),
            client_name: Some("Pierre Curie".into()),
            ..Default::default()
        };
        let updated = svc.update(BerthScope::Berth(1), a.id, patch).await.unwrap();
        assert_eq!(updated.berth_number.get(), 1);
        assert_eq!(updated.client_name, "Pierre Curie");
    }

    #[tokio::test]
    async fn nested_mismatch_is_not_found() {
        let svc = service_with_berths(&[1, 2], IntervalRule::Inclusive).await;
        let a = svc.create(BerthScope::Any, booking(Some(1), 10, 12)).await.unwrap();

        for result in [
            svc.get(BerthScope::Berth(2), a.id).await.map(|_| ()),
            svc.update(BerthScope::Berth(2), a.id, ReservationPatch::default())
                .await
                .map(|_| ()),
            svc.delete(BerthScope::Berth(2), a.id).await.map(|_| ()),
        ] {
            assert!(matches!(result, Err(DomainError::NotFound { entity: "Reservation", .. })));
        }
        assert!(svc.get(BerthScope::Berth(1), a.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_returns_record_and_frees_the_slot() {
        let svc = service_with_berths(&[1], IntervalRule::Inclusive).await;
        let a = svc.create(BerthScope::Any, booking(Some(1), 10, 12)).await.unwrap();

        let deleted = svc.delete(BerthScope::Berth(1), a.id).await.unwrap();
        assert_eq!(deleted.id, a.id);
        assert!(svc.availability(1, day(10), day(12)).await.unwrap().available);
        assert!(matches!(
            svc.delete(BerthScope::Any, a.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn availability_projects_inputs() {
        let svc = service_with_berths(&[1], IntervalRule::Inclusive).await;
        svc.create(BerthScope::Any, booking(Some(1), 10, 12)).await.unwrap();

        let busy = svc.availability(1, day(11), day(13)).await.unwrap();
        assert!(!busy.available);
        assert_eq!(busy.berth_number.get(), 1);
        assert_eq!(busy.start, day(11));
        assert!(svc.availability(2, day(11), day(13)).await.unwrap().available);
    }

    #[tokio::test]
    async fn in_progress_contains_now() {
        let svc = service_with_berths(&[1, 2], IntervalRule::Inclusive).await;
        svc.create(BerthScope::Any, booking(Some(1), 1, 20)).await.unwrap();
        svc.create(BerthScope::Any, booking(Some(2), 5, 8)).await.unwrap();
        svc.create(BerthScope::Any, booking(Some(2), 12, 14)).await.unwrap();

        let now = svc.in_progress_at(day(6)).await.unwrap();
        assert_eq!(now.len(), 2);
        assert_eq!(now[0].stay.end(), day(8));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_overlapping_creates_admit_exactly_one() {
        const N: u32 = 24;
        let svc = Arc::new(service_with_berths(&[1], IntervalRule::Inclusive).await);

        let mut tasks = Vec::new();
        for i in 0..N {
            let svc = svc.clone();
            // Every interval contains day 15, so each pair overlaps.
            let from = 15 - (i % 5);
            let to = 15 + (i % 7);
            tasks.push(tokio::spawn(async move {
                svc.create(BerthScope::Any, booking(Some(1), from, to)).await
            }));
        }

        let mut ok = 0;
        let mut conflicts = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => ok += 1,
                Err(DomainError::Conflict { .. }) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(conflicts, N - 1);
        assert_eq!(svc.list(BerthScope::Berth(1)).await.unwrap().len(), 1);
    }
}
