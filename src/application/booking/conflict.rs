//! Reservation conflict engine
//!
//! The single decision point for "would persisting this stay on this berth
//! break the no-overlap invariant". Stateless: every check is one read of
//! a single berth's reservations followed by [`StayInterval::overlaps`].

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{
    BerthNumber, DomainError, DomainResult, IntervalRule, Reservation, ReservationId,
    ReservationRepository, StayInterval,
};

/// Interval rule used when configuration does not pick one.
pub const DEFAULT_INTERVAL_RULE: IntervalRule = IntervalRule::Inclusive;

/// Result of a conflict check
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictOutcome {
    Clear,
    /// The first stored reservation found overlapping the candidate
    Conflict(Reservation),
}

impl ConflictOutcome {
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }

    pub fn conflicting(&self) -> Option<&Reservation> {
        match self {
            Self::Clear => None,
            Self::Conflict(r) => Some(r),
        }
    }

    /// Turn a conflict into [`DomainError::Conflict`] for callers about to write.
    pub fn into_result(self, berth: BerthNumber) -> DomainResult<()> {
        match self {
            Self::Clear => Ok(()),
            Self::Conflict(r) => Err(DomainError::Conflict {
                berth: berth.get(),
                conflicting: Some(r.id),
            }),
        }
    }
}

pub struct ConflictEngine<'a> {
    reservations: &'a dyn ReservationRepository,
    rule: IntervalRule,
}

impl<'a> ConflictEngine<'a> {
    pub fn new(reservations: &'a dyn ReservationRepository, rule: IntervalRule) -> Self {
        Self { reservations, rule }
    }

    pub fn rule(&self) -> IntervalRule {
        self.rule
    }

    /// Would a new reservation `[start, end]` on `berth` collide?
    pub async fn check_for_create(
        &self,
        berth: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<ConflictOutcome> {
        let (berth, stay) = self.validate(berth, start, end)?;
        let existing = self.reservations.find_by_berth(berth).await?;
        let outcome = self.scan(existing, &stay, None);
        self.trace(berth, &stay, &outcome, "create");
        Ok(outcome)
    }

    /// Like [`check_for_create`](Self::check_for_create), ignoring the
    /// reservation `id` itself so it never collides with its own prior state.
    pub async fn check_for_update(
        &self,
        id: ReservationId,
        berth: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<ConflictOutcome> {
        let (berth, stay) = self.validate(berth, start, end)?;
        let others = self.reservations.find_by_berth_excluding(berth, id).await?;
        let outcome = self.scan(others, &stay, Some(id));
        self.trace(berth, &stay, &outcome, "update");
        Ok(outcome)
    }

    /// Read-only pre-flight check; `true` means no overlap.
    pub async fn check_availability(
        &self,
        berth: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let (berth, stay) = self.validate(berth, start, end)?;
        let existing = self.reservations.find_by_berth(berth).await?;
        let outcome = self.scan(existing, &stay, None);
        Ok(outcome.is_clear())
    }

    // Interval first: a reversed interval is reported as such whatever the berth.
    fn validate(
        &self,
        berth: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<(BerthNumber, StayInterval)> {
        let stay = StayInterval::new(start, end, self.rule)?;
        let berth = BerthNumber::new(berth)?;
        Ok((berth, stay))
    }

    fn scan(
        &self,
        candidates: Vec<Reservation>,
        stay: &StayInterval,
        exclude: Option<ReservationId>,
    ) -> ConflictOutcome {
        candidates
            .into_iter()
            .filter(|r| Some(r.id) != exclude)
            .find(|r| r.overlaps(stay))
            .map_or(ConflictOutcome::Clear, ConflictOutcome::Conflict)
    }

    fn trace(&self, berth: BerthNumber, stay: &StayInterval, outcome: &ConflictOutcome, op: &str) {
        if let Some(existing) = outcome.conflicting() {
            debug!(
                berth = %berth,
                candidate = %stay,
                conflicting_id = %existing.id,
                existing = %existing.stay,
                operation = op,
                "Reservation conflict detected"
            );
        }
    }
}
