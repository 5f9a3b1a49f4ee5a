//! Repository for the `audit_log` table.
//!
//! Entries are appended inside the same transaction as the mutation they
//! record, chained by a SHA-256 integrity hash over the previous entry.

use chrono::Utc;
use pawres_core::audit::compute_integrity_hash;
use pawres_core::types::{DbId, EntityKind};
use sqlx::{SqliteConnection, SqliteExecutor};

use crate::models::audit::AuditEntry;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, actor_id, action, entity_kind, entity_id, details, integrity_hash, created_at";

/// Provides append and read operations for the audit log.
pub struct AuditRepo;

impl AuditRepo {
    /// Append an entry, chaining its integrity hash to the latest entry.
    ///
    /// Takes the transaction connection directly: the read-hash-then-insert
    /// pair must not interleave with other writers, which the single-writer
    /// store guarantees for the enclosing transaction.
    pub async fn append(
        conn: &mut SqliteConnection,
        actor_id: Option<DbId>,
        action: &str,
        kind: EntityKind,
        entity_id: DbId,
        details: Option<serde_json::Value>,
    ) -> Result<AuditEntry, sqlx::Error> {
        let prev_hash: Option<String> =
            sqlx::query_scalar("SELECT integrity_hash FROM audit_log ORDER BY id DESC LIMIT 1")
                .fetch_optional(&mut *conn)
                .await?;

        let details_text = details.map(|d| d.to_string());
        let entry_data = format!(
            "{}|{}|{}|{}|{}",
            actor_id.map_or_else(|| "system".to_string(), |id| id.to_string()),
            action,
            kind.as_str(),
            entity_id,
            details_text.as_deref().unwrap_or(""),
        );
        let hash = compute_integrity_hash(prev_hash.as_deref(), &entry_data);

        let query = format!(
            "INSERT INTO audit_log
                (actor_id, action, entity_kind, entity_id, details, integrity_hash, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(actor_id)
            .bind(action)
            .bind(kind.as_str())
            .bind(entity_id)
            .bind(details_text)
            .bind(hash)
            .bind(Utc::now())
            .fetch_one(&mut *conn)
            .await
    }

    /// List entries for one entity, oldest first.
    pub async fn list_for_entity(
        executor: impl SqliteExecutor<'_>,
        kind: EntityKind,
        entity_id: DbId,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_log
             WHERE entity_kind = ? AND entity_id = ?
             ORDER BY id"
        );
        sqlx::query_as::<_, AuditEntry>(&query)
            .bind(kind.as_str())
            .bind(entity_id)
            .fetch_all(executor)
            .await
    }

    /// Recompute the full hash chain and compare against stored hashes.
    pub async fn verify_chain(
        executor: impl SqliteExecutor<'_>,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audit_log ORDER BY id");
        let entries = sqlx::query_as::<_, AuditEntry>(&query)
            .fetch_all(executor)
            .await?;

        let mut prev: Option<String> = None;
        for entry in entries {
            let entry_data = format!(
                "{}|{}|{}|{}|{}",
                entry
                    .actor_id
                    .map_or_else(|| "system".to_string(), |id| id.to_string()),
                entry.action,
                entry.entity_kind,
                entry.entity_id,
                entry.details.as_deref().unwrap_or(""),
            );
            let expected = compute_integrity_hash(prev.as_deref(), &entry_data);
            if expected != entry.integrity_hash {
                return Ok(false);
            }
            prev = Some(entry.integrity_hash);
        }
        Ok(true)
    }
}
