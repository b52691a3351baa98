//! Berth management

pub mod service;

pub use service::BerthService;
