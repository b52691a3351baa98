//! Users module: staff directory CRUD

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
