//! Berth repository interface

use async_trait::async_trait;

use super::model::{Berth, BerthNumber, NewBerth};
use crate::domain::DomainResult;

#[async_trait]
pub trait BerthRepository: Send + Sync {
    /// Persist a new berth and return it with its timestamps
    async fn insert(&self, berth: NewBerth) -> DomainResult<Berth>;

    /// Find berth by number
    async fn find_by_number(&self, number: BerthNumber) -> DomainResult<Option<Berth>>;

    /// All berths, ascending by number
    async fn find_all(&self) -> DomainResult<Vec<Berth>>;

    /// Overwrite kind and state of an existing berth
    async fn update(&self, berth: Berth) -> DomainResult<Berth>;

    /// Delete a berth, returning the removed record if it existed
    async fn delete(&self, number: BerthNumber) -> DomainResult<Option<Berth>>;
}
