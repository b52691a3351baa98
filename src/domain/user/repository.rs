use async_trait::async_trait;
use uuid::Uuid;

use super::{NewUser, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: NewUser) -> DomainResult<User>;

    /// Newest first
    async fn find_all(&self) -> DomainResult<Vec<User>>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;
    /// `email` must already be normalized
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn update(&self, user: User) -> DomainResult<User>;
    async fn delete(&self, id: Uuid) -> DomainResult<Option<User>>;
}
