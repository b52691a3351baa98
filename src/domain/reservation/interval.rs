//! Closed date intervals occupied by reservations

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Which bounds form a valid stay.
///
/// The historical write paths required `start < end` while the data model
/// only promises `start <= end`; the rule is therefore configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalRule {
    /// `start <= end`: a single-instant stay is valid.
    #[default]
    Inclusive,
    /// `start < end`
    Strict,
}

impl IntervalRule {
    pub fn admits(self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        match self {
            Self::Inclusive => start <= end,
            Self::Strict => start < end,
        }
    }

    /// How `start` must relate to `end`, for error messages.
    pub fn requirement(&self) -> &'static str {
        match self {
            Self::Inclusive => "on or before",
            Self::Strict => "strictly before",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inclusive => "inclusive",
            Self::Strict => "strict",
        }
    }
}

impl FromStr for IntervalRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inclusive" => Ok(Self::Inclusive),
            "strict" => Ok(Self::Strict),
            other => Err(DomainError::Validation(format!(
                "interval_rule: expected 'inclusive' or 'strict', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for IntervalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed interval `[start, end]` of a berth occupation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl StayInterval {
    /// Fails with [`DomainError::InvalidInterval`] when `rule` rejects the bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, rule: IntervalRule) -> DomainResult<Self> {
        if !rule.admits(start, end) {
            return Err(DomainError::InvalidInterval { start, end, rule });
        }
        Ok(Self { start, end })
    }

    /// Rebuild an interval read back from the store, where it was validated
    /// on the way in.
    pub(crate) fn restore(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Two stays overlap iff `s1 <= e2 && s2 <= e1`. Touching bounds count:
    /// a stay ending on day X collides with one starting on day X.
    pub fn overlaps(&self, other: &StayInterval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

impl fmt::Display for StayInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, d, 0, 0, 0).unwrap()
    }

    fn stay(from: u32, to: u32) -> StayInterval {
        StayInterval::new(day(from), day(to), IntervalRule::Inclusive).unwrap()
    }

    #[test]
    fn shared_boundary_day_overlaps() {
        assert!(stay(10, 12).overlaps(&stay(12, 14)));
        assert!(stay(12, 14).overlaps(&stay(10, 12)));
    }

    #[test]
    fn disjoint_stays_do_not_overlap() {
        assert!(!stay(10, 12).overlaps(&stay(13, 15)));
    }

    #[test]
    fn containment_overlaps() {
        assert!(stay(1, 20).overlaps(&stay(5, 6)));
        assert!(stay(5, 6).overlaps(&stay(1, 20)));
    }

    #[test]
    fn reversed_bounds_are_rejected_under_both_rules() {
        for rule in [IntervalRule::Inclusive, IntervalRule::Strict] {
            let err = StayInterval::new(day(12), day(10), rule).unwrap_err();
            assert!(matches!(err, DomainError::InvalidInterval { .. }));
        }
    }

    #[test]
    fn single_instant_depends_on_rule() {
        assert!(StayInterval::new(day(10), day(10), IntervalRule::Inclusive).is_ok());
        assert!(matches!(
            StayInterval::new(day(10), day(10), IntervalRule::Strict),
            Err(DomainError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn rejection_message_names_the_rule() {
        let reversed = StayInterval::new(day(12), day(10), IntervalRule::Inclusive).unwrap_err();
        assert!(reversed.to_string().contains("must be on or before end"));

        let equal = StayInterval::new(day(10), day(10), IntervalRule::Strict).unwrap_err();
        assert!(equal.to_string().contains("must be strictly before end"));
    }

    #[test]
    fn rule_parses_from_config_strings() {
        assert_eq!("strict".parse::<IntervalRule>().unwrap(), IntervalRule::Strict);
        assert_eq!("inclusive".parse::<IntervalRule>().unwrap(), IntervalRule::Inclusive);
        assert!("lenient".parse::<IntervalRule>().is_err());
        assert_eq!(IntervalRule::default(), IntervalRule::Inclusive);
    }

    #[test]
    fn contains_is_inclusive() {
        let s = stay(10, 12);
        assert!(s.contains(day(10)));
        assert!(s.contains(day(12)));
        assert!(!s.contains(day(12) + Duration::seconds(1)));
    }

    fn arb_stay() -> impl Strategy<Value = StayInterval> {
        (0i64..10_000, 0i64..500).prop_map(|(offset, len)| {
            let start = day(1) + Duration::hours(offset);
            StayInterval::new(start, start + Duration::hours(len), IntervalRule::Inclusive)
                .unwrap()
        })
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in arb_stay(), b in arb_stay()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn every_stay_overlaps_itself(a in arb_stay()) {
            prop_assert!(a.overlaps(&a));
        }

        #[test]
        fn overlap_matches_shared_instant(a in arb_stay(), b in arb_stay()) {
            let latest_start = a.start().max(b.start());
            let earliest_end = a.end().min(b.end());
            prop_assert_eq!(a.overlaps(&b), latest_start <= earliest_end);
        }
    }
}
