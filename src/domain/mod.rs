//! Domain layer
//!
//! Marina entities, value types and the repository contracts the
//! application layer depends on. Nothing here knows about HTTP or SQL.

pub mod berth;
pub mod repositories;
pub mod reservation;
pub mod user;

pub use berth::{Berth, BerthKind, BerthNumber, BerthPatch, BerthRepository, NewBerth};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    IntervalRule, NewReservation, Reservation, ReservationId, ReservationPatch,
    ReservationRepository, StayInterval,
};
pub use user::{NewUser, User, UserPatch, UserRepository, UserRole};

pub use crate::shared::errors::DomainError;
