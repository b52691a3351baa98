//! Database entities module

pub mod berth;
pub mod reservation;
pub mod user;

pub use berth::Entity as Berth;
pub use reservation::Entity as Reservation;
pub use user::Entity as User;
