//! Identity module: the user directory
//!
//! Contains the `UserService` which orchestrates user-related use-cases.

pub mod service;

pub use service::UserService;
