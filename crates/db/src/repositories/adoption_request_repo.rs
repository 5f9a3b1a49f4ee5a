//! Repository for the `adoption_requests` table.

use chrono::Utc;
use pawres_core::types::{DbId, Timestamp};
use sqlx::SqliteExecutor;

use crate::models::adoption_request::{AdoptionRequest, CreateAdoptionRequest};
use crate::models::status::AdoptionStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, animal_id, contact, reason, status, denial_reason, \
    denied_by, was_approved, approved_at, archived_at, archived_by, archive_note, \
    removed_at, removed_by, removal_reason, created_at, updated_at";

/// Provides CRUD operations for adoption requests.
pub struct AdoptionRequestRepo;

impl AdoptionRequestRepo {
    /// Insert a new request with status `pending`, returning the created row.
    pub async fn create(
        executor: impl SqliteExecutor<'_>,
        input: &CreateAdoptionRequest,
    ) -> Result<AdoptionRequest, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO adoption_requests
                (user_id, animal_id, contact, reason, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdoptionRequest>(&query)
            .bind(input.user_id)
            .bind(input.animal_id)
            .bind(&input.contact)
            .bind(&input.reason)
            .bind(AdoptionStatus::Pending)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Find a request by internal ID.
    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<Option<AdoptionRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM adoption_requests WHERE id = ?");
        sqlx::query_as::<_, AdoptionRequest>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all non-hidden requests, newest first.
    pub async fn list_active(
        executor: impl SqliteExecutor<'_>,
    ) -> Result<Vec<AdoptionRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM adoption_requests
             WHERE archived_at IS NULL AND removed_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AdoptionRequest>(&query)
            .fetch_all(executor)
            .await
    }

    /// List requests submitted by a specific user, newest first.
    pub async fn list_for_user(
        executor: impl SqliteExecutor<'_>,
        user_id: DbId,
    ) -> Result<Vec<AdoptionRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM adoption_requests
             WHERE user_id = ? AND removed_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AdoptionRequest>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// Count every request referencing an animal, regardless of status.
    /// Used by the rescue-revert guard: any history blocks animal deletion.
    pub async fn count_for_animal(
        executor: impl SqliteExecutor<'_>,
        animal_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM adoption_requests WHERE animal_id = ?")
            .bind(animal_id)
            .fetch_one(executor)
            .await
    }

    /// Mark a request approved: status, `approved_at`, and the immutable
    /// `was_approved` historical flag, in one statement.
    pub async fn approve(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
        approved_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE adoption_requests
             SET status = ?, was_approved = 1, approved_at = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(AdoptionStatus::Approved)
        .bind(approved_at)
        .bind(approved_at)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a request denied with a reason. `denied_by` is `None` for
    /// system-generated auto-denials, the acting admin otherwise.
    pub async fn deny(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
        reason: &str,
        denied_by: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE adoption_requests
             SET status = ?, denial_reason = ?, denied_by = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(AdoptionStatus::Denied)
        .bind(reason)
        .bind(denied_by)
        .bind(Utc::now())
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Auto-deny every *other* pending request for the same animal,
    /// returning the ids that were denied.
    pub async fn deny_other_pending_for_animal(
        executor: impl SqliteExecutor<'_>,
        animal_id: DbId,
        except_id: DbId,
        reason: &str,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "UPDATE adoption_requests
             SET status = ?, denial_reason = ?, denied_by = NULL, updated_at = ?
             WHERE animal_id = ? AND id != ? AND status = ?
             RETURNING id",
        )
        .bind(AdoptionStatus::Denied)
        .bind(reason)
        .bind(Utc::now())
        .bind(animal_id)
        .bind(except_id)
        .bind(AdoptionStatus::Pending)
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Mark a request cancelled by its requester.
    pub async fn cancel(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE adoption_requests SET status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(AdoptionStatus::Cancelled)
        .bind(Utc::now())
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
