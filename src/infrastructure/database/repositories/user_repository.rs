use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, NewUser, User, UserRepository, UserRole};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::User => UserRole::User,
        user::UserRole::Admin => UserRole::Admin,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::User => user::UserRole::User,
        UserRole::Admin => user::UserRole::Admin,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        role: entity_role_to_domain(model.role),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

fn write_err(e: sea_orm::DbErr, email: &str) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::AlreadyExists(format!("email {} is already registered", email))
        }
        _ => db_err(e),
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn insert(&self, u: NewUser) -> DomainResult<User> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(u.name),
            email: Set(u.email.clone()),
            role: Set(domain_role_to_entity(u.role)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = model
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, &u.email))?;
        Ok(user_model_to_domain(saved))
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_model_to_domain))
    }

    async fn update(&self, u: User) -> DomainResult<User> {
        let existing = user::Entity::find_by_id(u.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("User", "id", u.id));
        };

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(u.name);
        active.email = Set(u.email.clone());
        active.role = Set(domain_role_to_entity(u.role));
        active.updated_at = Set(Utc::now());
        let saved = active
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, &u.email))?;
        Ok(user_model_to_domain(saved))
    }

    async fn delete(&self, id: Uuid) -> DomainResult<Option<User>> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };
        let removed = user_model_to_domain(existing.clone());
        existing.delete(&self.db).await.map_err(db_err)?;
        Ok(Some(removed))
    }
}
