//! Booking module: the reservation conflict engine and the use-cases
//! that write reservations through it.

pub mod conflict;
pub mod locks;
pub mod service;

pub use conflict::{ConflictEngine, ConflictOutcome, DEFAULT_INTERVAL_RULE};
pub use locks::{BerthGuard, BerthLocks};
pub use service::{Availability, BerthScope, CreateReservation, ReservationService};
