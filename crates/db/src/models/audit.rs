//! Audit log entry model.

use pawres_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An audit log row. Entries are written inside the same transaction as the
/// mutation they record and chained via `integrity_hash`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEntry {
    pub id: DbId,
    /// `None` for system-initiated actions (e.g. import jobs).
    pub actor_id: Option<DbId>,
    pub action: String,
    pub entity_kind: String,
    pub entity_id: DbId,
    /// JSON detail payload (old/new status, reasons, counts).
    pub details: Option<String>,
    pub integrity_hash: String,
    pub created_at: Timestamp,
}
