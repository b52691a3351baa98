//! Session-gated dashboard summary

pub mod handlers;

pub use handlers::*;
