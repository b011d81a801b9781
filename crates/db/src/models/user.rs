//! User entity model and DTOs.

use helpdesk_core::roles::Role;
use helpdesk_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub skills: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user. The role always starts as `user`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// DTO for an admin role change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRole {
    pub role: Role,
}
