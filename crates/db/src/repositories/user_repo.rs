//! Repository for the `users` table.

use chrono::Utc;
use pawres_core::types::DbId;
use sqlx::SqliteExecutor;

use crate::models::user::{CreateUser, User, ROLE_MEMBER};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, password_hash, role, is_disabled, \
    archived_at, archived_by, archive_note, removed_at, removed_by, removal_reason, \
    created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// If `role` is `None` in the input, defaults to `member`.
    pub async fn create(
        executor: impl SqliteExecutor<'_>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO users (name, email, phone, password_hash, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.password_hash)
            .bind(input.role.as_deref().unwrap_or(ROLE_MEMBER))
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a user by email (unique).
    pub async fn find_by_email(
        executor: impl SqliteExecutor<'_>,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    /// List all non-hidden users, newest first.
    pub async fn list(executor: impl SqliteExecutor<'_>) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE archived_at IS NULL AND removed_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, User>(&query).fetch_all(executor).await
    }

    /// Enable or disable a user account. Returns `true` if a row changed.
    pub async fn set_disabled(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
        disabled: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_disabled = ?, updated_at = ? WHERE id = ?")
            .bind(disabled)
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a user. The store cascades the user's adoption
    /// requests and nulls the actor reference on their rescue reports.
    pub async fn hard_delete(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
