//! Application layer: use-case services over the domain repositories.

pub mod berths;
pub mod booking;
pub mod identity;

pub use berths::BerthService;
pub use booking::{
    Availability, BerthScope, ConflictEngine, ConflictOutcome, CreateReservation,
    ReservationService, DEFAULT_INTERVAL_RULE,
};
pub use identity::UserService;
