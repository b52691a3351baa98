//! # Marina berth reservation service
//!
//! REST service for a marina's berths (catways) and the reservations
//! placed on them. Two reservations on the same berth never overlap.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, value types and repository traits
//! - **application**: Use cases: booking (conflict engine, berth locks), berths, users
//! - **infrastructure**: SeaORM persistence and the in-memory store
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Error taxonomy, shutdown coordination, date parsing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod seed;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

// Re-export API router
pub use interfaces::http::create_api_router;
