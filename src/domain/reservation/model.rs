//! Reservation domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::interval::{IntervalRule, StayInterval};
use crate::domain::{BerthNumber, DomainError, DomainResult};

/// Store-assigned reservation identifier
pub type ReservationId = Uuid;

/// A client's booked occupancy of one berth
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: ReservationId,
    pub berth_number: BerthNumber,
    pub client_name: String,
    pub boat_name: String,
    pub stay: StayInterval,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn overlaps(&self, stay: &StayInterval) -> bool {
        self.stay.overlaps(stay)
    }
}

/// Insert payload; id and timestamps come from the store
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub berth_number: BerthNumber,
    pub client_name: String,
    pub boat_name: String,
    pub stay: StayInterval,
}

impl NewReservation {
    pub fn new(
        berth_number: BerthNumber,
        client_name: &str,
        boat_name: &str,
        stay: StayInterval,
    ) -> DomainResult<Self> {
        Ok(Self {
            berth_number,
            client_name: validate_client_name(client_name)?,
            boat_name: validate_boat_name(boat_name)?,
            stay,
        })
    }
}

/// Partial update: `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ReservationPatch {
    pub berth_number: Option<BerthNumber>,
    pub client_name: Option<String>,
    pub boat_name: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl ReservationPatch {
    pub fn is_empty(&self) -> bool {
        self.berth_number.is_none()
            && self.client_name.is_none()
            && self.boat_name.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }

    /// Merge onto `current`, then validate the merged record as a whole.
    ///
    /// Bounds are checked after merging, so moving only `end` before the
    /// stored `start` fails with `InvalidInterval`.
    pub fn apply(&self, current: &Reservation, rule: IntervalRule) -> DomainResult<Reservation> {
        let start = self.start.unwrap_or(current.stay.start());
        let end = self.end.unwrap_or(current.stay.end());

        let client_name = match &self.client_name {
            Some(name) => validate_client_name(name)?,
            None => current.client_name.clone(),
        };
        let boat_name = match &self.boat_name {
            Some(name) => validate_boat_name(name)?,
            None => current.boat_name.clone(),
        };

        Ok(Reservation {
            id: current.id,
            berth_number: self.berth_number.unwrap_or(current.berth_number),
            client_name,
            boat_name,
            stay: StayInterval::new(start, end, rule)?,
            created_at: current.created_at,
            updated_at: current.updated_at,
        })
    }
}

/// Trimmed client name, 2 to 120 characters.
pub fn validate_client_name(name: &str) -> DomainResult<String> {
    bounded_text("client_name", name, 2, 120)
}

/// Trimmed boat name, 1 to 120 characters.
pub fn validate_boat_name(name: &str) -> DomainResult<String> {
    bounded_text("boat_name", name, 1, 120)
}

fn bounded_text(field: &str, value: &str, min: usize, max: usize) -> DomainResult<String> {
    let value = value.trim();
    let len = value.chars().count();
    if len < min || len > max {
        return Err(DomainError::Validation(format!(
            "{} must be {}-{} characters",
            field, min, max
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, d, 0, 0, 0).unwrap()
    }

    fn sample_reservation() -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            berth_number: BerthNumber::new(3).unwrap(),
            client_name: "Jeanne Martin".into(),
            boat_name: "Mistral".into(),
            stay: StayInterval::new(day(10), day(12), IntervalRule::Inclusive).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_patch_reproduces_record() {
        let r = sample_reservation();
        let patch = ReservationPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(&r, IntervalRule::Inclusive).unwrap(), r);
    }

    #[test]
    fn patch_merges_then_validates_interval() {
        let r = sample_reservation();
        let patch = ReservationPatch {
            end: Some(day(9)),
            ..Default::default()
        };
        let err = patch.apply(&r, IntervalRule::Inclusive).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInterval { .. }));
    }

    #[test]
    fn patch_moves_only_given_bound() {
        let r = sample_reservation();
        let patch = ReservationPatch {
            end: Some(day(20)),
            ..Default::default()
        };
        let next = patch.apply(&r, IntervalRule::Inclusive).unwrap();
        assert_eq!(next.stay.start(), day(10));
        assert_eq!(next.stay.end(), day(20));
        assert_eq!(next.id, r.id);
    }

    #[test]
    fn patch_trims_and_checks_names() {
        let r = sample_reservation();
        let ok = ReservationPatch {
            client_name: Some("  Ana  ".into()),
            ..Default::default()
        }
        .apply(&r, IntervalRule::Inclusive)
        .unwrap();
        assert_eq!(ok.client_name, "Ana");

        let err = ReservationPatch {
            boat_name: Some("   ".into()),
            ..Default::default()
        }
        .apply(&r, IntervalRule::Inclusive)
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn patch_can_move_berth() {
        let r = sample_reservation();
        let next = ReservationPatch {
            berth_number: Some(BerthNumber::new(9).unwrap()),
            ..Default::default()
        }
        .apply(&r, IntervalRule::Inclusive)
        .unwrap();
        assert_eq!(next.berth_number.get(), 9);
        assert_eq!(next.stay, r.stay);
    }

    #[test]
    fn new_reservation_validates_names() {
        let stay = StayInterval::new(day(1), day(2), IntervalRule::Inclusive).unwrap();
        let berth = BerthNumber::new(1).unwrap();
        assert!(NewReservation::new(berth, "J", "Boat", stay).is_err());
        assert!(NewReservation::new(berth, "Jo", "", stay).is_err());
        assert!(NewReservation::new(berth, "Jo", "B", stay).is_ok());
    }
}
