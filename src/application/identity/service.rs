//! User management service: application-layer orchestration
//!
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{
    DomainError, DomainResult, NewUser, RepositoryProvider, User, UserPatch, UserRole,
};

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// All users, newest first.
    pub async fn list(&self) -> DomainResult<Vec<User>> {
        self.repos.users().find_all().await
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    // ── Commands (mutations) ────────────────────────────────────

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        role: Option<UserRole>,
    ) -> DomainResult<User> {
        let new = NewUser::new(name, email, role)?;
        self.ensure_email_free(&new.email, None).await?;

        let user = self.repos.users().insert(new).await?;
        info!(user_id = %user.id, email = %user.email, "New user created");
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, patch: UserPatch) -> DomainResult<User> {
        let current = self.get(id).await?;
        let next = current.patched(patch)?;
        if next.email != current.email {
            self.ensure_email_free(&next.email, Some(id)).await?;
        }
        let saved = self.repos.users().update(next).await?;
        info!(user_id = %saved.id, "User updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> DomainResult<User> {
        let deleted = self
            .repos
            .users()
            .delete(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(user_id = %id, "User deleted");
        Ok(deleted)
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<Uuid>) -> DomainResult<()> {
        match self.repos.users().find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::AlreadyExists(
                format!("email {} is already registered", email),
            )),
            _ => Ok(()),
        }
    }
}

fn not_found(id: Uuid) -> DomainError {
    DomainError::not_found("User", "id", id)
}
