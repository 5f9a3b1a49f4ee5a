//! Repository for the `rescue_reports` table.

use chrono::Utc;
use pawres_core::types::{DbId, Timestamp};
use sqlx::SqliteExecutor;

use crate::models::rescue_report::{CreateRescueReport, RescueReport};
use crate::models::status::RescueStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, animal_id, location, latitude, longitude, \
    animal_type, animal_name, reporter_name, reporter_phone, urgency, status, notes, \
    rescued_at, archived_at, archived_by, archive_note, removed_at, removed_by, \
    removal_reason, created_at, updated_at";

/// Provides CRUD operations for rescue reports.
pub struct RescueReportRepo;

impl RescueReportRepo {
    /// Insert a new report with status `pending`, returning the created row.
    pub async fn create(
        executor: impl SqliteExecutor<'_>,
        input: &CreateRescueReport,
    ) -> Result<RescueReport, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO rescue_reports
                (user_id, location, latitude, longitude, animal_type, animal_name,
                 reporter_name, reporter_phone, urgency, status, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RescueReport>(&query)
            .bind(input.user_id)
            .bind(&input.location)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.animal_type)
            .bind(&input.animal_name)
            .bind(&input.reporter_name)
            .bind(&input.reporter_phone)
            .bind(input.urgency.unwrap_or_default())
            .bind(RescueStatus::Pending)
            .bind(&input.notes)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Find a report by internal ID.
    pub async fn find_by_id(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
    ) -> Result<Option<RescueReport>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rescue_reports WHERE id = ?");
        sqlx::query_as::<_, RescueReport>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all non-hidden reports, newest first.
    pub async fn list_active(
        executor: impl SqliteExecutor<'_>,
    ) -> Result<Vec<RescueReport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rescue_reports
             WHERE archived_at IS NULL AND removed_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, RescueReport>(&query)
            .fetch_all(executor)
            .await
    }

    /// List reports submitted by a specific user, newest first.
    pub async fn list_for_user(
        executor: impl SqliteExecutor<'_>,
        user_id: DbId,
    ) -> Result<Vec<RescueReport>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rescue_reports
             WHERE user_id = ? AND removed_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, RescueReport>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// Set the canonical status. `rescued_at` is written only when provided
    /// (the transition into `rescued`); it is never cleared by later
    /// transitions.
    pub async fn set_status(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
        status: RescueStatus,
        rescued_at: Option<Timestamp>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE rescue_reports
             SET status = ?, rescued_at = COALESCE(?, rescued_at), updated_at = ?
             WHERE id = ?",
        )
        .bind(status)
        .bind(rescued_at)
        .bind(Utc::now())
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link or unlink the spawned animal.
    pub async fn set_animal(
        executor: impl SqliteExecutor<'_>,
        id: DbId,
        animal_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE rescue_reports SET animal_id = ?, updated_at = ? WHERE id = ?")
                .bind(animal_id)
                .bind(Utc::now())
                .bind(id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
