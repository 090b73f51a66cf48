//! Identity profile with a role fixed at registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Donor,
    Ngo,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Ngo => "ngo",
            Self::Admin => "admin",
        }
    }

    /// Parse the role claim carried in a token.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "donor" => Some(Self::Donor),
            "ngo" => Some(Self::Ngo),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Full profile row (includes password_hash, never serialized to the API).
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile response DTO without password_hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            role: p.role,
            phone: p.phone,
            address: p.address,
            created_at: p.created_at,
        }
    }
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterProfile {
    #[validate(length(min = 1, max = 128, message = "Name must be 1-128 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: UserRole,
    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 256, message = "Address must not exceed 256 characters"))]
    pub address: Option<String>,
}

/// Profile fields handed to the datastore once the password is hashed.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
}
