//! Reservations module: flat and berth-nested reservation routes plus
//! the availability query

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
