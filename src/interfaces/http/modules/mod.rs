pub mod auth;
pub mod berths;
pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod reservations;
pub mod users;
