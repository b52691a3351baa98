use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::Validation(format!(
                "role: expected 'user' or 'admin', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User model
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Trimmed and lowercased; unique across users
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl NewUser {
    pub fn new(name: &str, email: &str, role: Option<UserRole>) -> DomainResult<Self> {
        Ok(Self {
            name: validate_name(name)?,
            email: normalize_email(email)?,
            role: role.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

impl User {
    pub fn patched(&self, patch: UserPatch) -> DomainResult<User> {
        let mut next = self.clone();
        if let Some(name) = patch.name {
            next.name = validate_name(&name)?;
        }
        if let Some(email) = patch.email {
            next.email = normalize_email(&email)?;
        }
        if let Some(role) = patch.role {
            next.role = role;
        }
        Ok(next)
    }
}

pub fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    let len = name.chars().count();
    if !(2..=120).contains(&len) {
        return Err(DomainError::Validation(
            "name must be 2-120 characters".into(),
        ));
    }
    Ok(name.to_string())
}

/// Trim and lowercase an address, rejecting anything without a `local@domain` shape.
pub fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::Validation(format!(
            "email: '{}' is not a valid address",
            email
        )));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Capitaine@Port.FR ").unwrap(),
            "capitaine@port.fr"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in ["", "nobody", "@port.fr", "a@", "a@b@c", "a b@port.fr"] {
            assert!(normalize_email(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn new_user_defaults_to_user_role() {
        let user = NewUser::new("Lou", "lou@port.fr", None).unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(NewUser::new("L", "lou@port.fr", None).is_err());
    }

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert!("captain".parse::<UserRole>().is_err());
    }
}
