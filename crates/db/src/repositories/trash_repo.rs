//! Repository for cross-table archive / removal operations.
//!
//! All four entity tables share the same soft-delete metadata columns, so
//! archive, restore, remove, and purge are written once here and dispatched
//! by table name. State *decisions* (already archived, not removed, and so
//! on) belong to the engine; this layer only executes guarded statements.

use chrono::Utc;
use pawres_core::types::{DbId, EntityKind, Timestamp};
use serde::Serialize;
use sqlx::SqliteExecutor;

/// Soft-delete state of a row, independent of its canonical status.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct SoftState {
    pub archived_at: Option<Timestamp>,
    pub removed_at: Option<Timestamp>,
}

impl SoftState {
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    pub fn is_removed(&self) -> bool {
        self.removed_at.is_some()
    }
}

/// A single hidden (archived or removed) item surfaced in the trash list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HiddenItem {
    pub id: DbId,
    pub entity_kind: String,
    pub label: Option<String>,
    pub archived_at: Option<Timestamp>,
    pub removed_at: Option<Timestamp>,
}

/// Entity kinds that participate in archive/removal, with the SQL expression
/// yielding a human-readable label per table.
const KINDS: &[(EntityKind, &str)] = &[
    (EntityKind::Users, "name"),
    (EntityKind::Animals, "name"),
    (EntityKind::RescueReports, "location"),
    (EntityKind::AdoptionRequests, "contact"),
];

fn label_expr(kind: EntityKind) -> &'static str {
    KINDS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, expr)| *expr)
        .unwrap_or("NULL")
}

/// Provides cross-table archive/removal operations.
pub struct TrashRepo;

impl TrashRepo {
    /// Fetch a row's soft-delete state, or `None` if the row does not exist.
    pub async fn soft_state(
        executor: impl SqliteExecutor<'_>,
        kind: EntityKind,
        id: DbId,
    ) -> Result<Option<SoftState>, sqlx::Error> {
        let sql = format!(
            "SELECT archived_at, removed_at FROM {} WHERE id = ?",
            kind.as_str()
        );
        sqlx::query_as::<_, SoftState>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Mark a live row archived. Returns `true` if a row changed.
    pub async fn archive(
        executor: impl SqliteExecutor<'_>,
        kind: EntityKind,
        id: DbId,
        actor_id: DbId,
        note: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let now = Utc::now();
        let sql = format!(
            "UPDATE {} SET archived_at = ?, archived_by = ?, archive_note = ?, updated_at = ?
             WHERE id = ? AND archived_at IS NULL AND removed_at IS NULL",
            kind.as_str()
        );
        let result = sqlx::query(&sql)
            .bind(now)
            .bind(actor_id)
            .bind(note)
            .bind(now)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear archive metadata on an archived row. The canonical status
    /// column was never touched, so the entity resumes its prior state
    /// exactly. Returns `true` if a row changed.
    pub async fn restore(
        executor: impl SqliteExecutor<'_>,
        kind: EntityKind,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!(
            "UPDATE {} SET archived_at = NULL, archived_by = NULL, archive_note = NULL,
                 updated_at = ?
             WHERE id = ? AND archived_at IS NOT NULL AND removed_at IS NULL",
            kind.as_str()
        );
        let result = sqlx::query(&sql)
            .bind(Utc::now())
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch the canonical status column for kinds that carry one. Users
    /// have no status lifecycle beyond the disabled flag.
    pub async fn status_text(
        executor: impl SqliteExecutor<'_>,
        kind: EntityKind,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        if kind == EntityKind::Users {
            return Ok(None);
        }
        let sql = format!("SELECT status FROM {} WHERE id = ?", kind.as_str());
        sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Mark a row removed (irreversible). Clears any archive metadata so a
    /// row is never both. Returns `true` if a row changed.
    pub async fn remove(
        executor: impl SqliteExecutor<'_>,
        kind: EntityKind,
        id: DbId,
        actor_id: DbId,
        reason: &str,
    ) -> Result<bool, sqlx::Error> {
        let now = Utc::now();
        let sql = format!(
            "UPDATE {} SET removed_at = ?, removed_by = ?, removal_reason = ?,
                 archived_at = NULL, archived_by = NULL, archive_note = NULL,
                 updated_at = ?
             WHERE id = ? AND removed_at IS NULL",
            kind.as_str()
        );
        let result = sqlx::query(&sql)
            .bind(now)
            .bind(actor_id)
            .bind(reason)
            .bind(now)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Physically delete a previously-removed row. Returns `true` if a row
    /// was deleted.
    pub async fn purge(
        executor: impl SqliteExecutor<'_>,
        kind: EntityKind,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!(
            "DELETE FROM {} WHERE id = ? AND removed_at IS NOT NULL",
            kind.as_str()
        );
        let result = sqlx::query(&sql).bind(id).execute(executor).await?;
        Ok(result.rows_affected() > 0)
    }

    /// List hidden rows across every entity table, most recently hidden
    /// first. When `kind` is `Some`, only that table is queried.
    pub async fn list_hidden(
        executor: impl SqliteExecutor<'_>,
        kind: Option<EntityKind>,
    ) -> Result<Vec<HiddenItem>, sqlx::Error> {
        let selects: Vec<String> = KINDS
            .iter()
            .filter(|(k, _)| kind.is_none() || kind == Some(*k))
            .map(|(k, label)| {
                format!(
                    "SELECT id, '{kind}' AS entity_kind, {label} AS label,
                            archived_at, removed_at
                     FROM {kind}
                     WHERE archived_at IS NOT NULL OR removed_at IS NOT NULL",
                    kind = k.as_str(),
                )
            })
            .collect();
        let sql = format!(
            "{} ORDER BY COALESCE(removed_at, archived_at) DESC",
            selects.join(" UNION ALL ")
        );
        sqlx::query_as::<_, HiddenItem>(&sql).fetch_all(executor).await
    }
}
