//! Reservation aggregate
//!
//! Contains the Reservation entity, the stay interval it occupies,
//! and the repository interface.

pub mod interval;
pub mod model;
pub mod repository;

pub use interval::{IntervalRule, StayInterval};
pub use model::{NewReservation, Reservation, ReservationId, ReservationPatch};
pub use repository::ReservationRepository;
