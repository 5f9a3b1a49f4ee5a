//! User (reporter/actor) entity model and DTOs.

use pawres_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Roles a user may hold. Admins run transitions, archive, and removal.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MEMBER: &str = "member";

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
    pub is_disabled: bool,
    pub archived_at: Option<Timestamp>,
    pub archived_by: Option<DbId>,
    pub archive_note: Option<String>,
    pub removed_at: Option<Timestamp>,
    pub removed_by: Option<DbId>,
    pub removal_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// DTO for creating a new user. The password arrives pre-hashed; hashing is
/// an edge concern of the API layer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    /// Defaults to `member` if omitted.
    pub role: Option<String>,
}
