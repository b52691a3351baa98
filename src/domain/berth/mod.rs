//! Berth aggregate
//!
//! Numbered mooring slots that reservations are made against.

pub mod model;
pub mod repository;

pub use model::{Berth, BerthKind, BerthNumber, BerthPatch, NewBerth};
pub use repository::BerthRepository;
