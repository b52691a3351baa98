//! Repository access for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::berth::BerthRepository;
use super::reservation::ReservationRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let berth = repos.berths().find_by_number(number).await?;
///     let taken = repos.reservations().find_by_berth(number).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn berths(&self) -> &dyn BerthRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn users(&self) -> &dyn UserRepository;
}
