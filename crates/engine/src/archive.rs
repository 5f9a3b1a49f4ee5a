//! Archive / removal subsystem.
//!
//! Two orthogonal soft-delete axes layered on the transition engine:
//! archive is reversible and keeps the entity countable in analytics;
//! removal is irreversible (spam, duplicates, test data) and excludes it.
//! Neither touches the canonical status column, so restoring an archived
//! entity resumes its exact prior state. Both bypass the per-kind state
//! machines but still run inside the transactional store, write audit
//! entries, and invalidate caches after commit.

use futures::future::FutureExt;
use sqlx::SqliteConnection;

use pawres_core::audit::actions;
use pawres_core::types::{ActorContext, DbId, EntityKind};
use pawres_db::repositories::trash_repo::HiddenItem;
use pawres_db::repositories::{AuditRepo, TrashRepo};

use crate::cache::namespaces;
use crate::engine::TransitionEngine;
use crate::error::{EngineError, EngineResult};

impl TransitionEngine {
    /// Archive an entity (reversible). Archiving an already-archived or
    /// removed entity is an explicit conflict, never silent corruption.
    pub async fn archive(
        &self,
        kind: EntityKind,
        id: DbId,
        ctx: ActorContext,
        note: Option<String>,
    ) -> EngineResult<()> {
        self.store()
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let state = TrashRepo::soft_state(&mut *conn, kind, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found(kind.entity_label(), id))?;
                    if state.is_removed() {
                        return Err(EngineError::conflict(format!(
                            "{} {id} has been removed and cannot be archived",
                            kind.entity_label()
                        )));
                    }
                    if state.is_archived() {
                        return Err(EngineError::conflict(format!(
                            "{} {id} is already archived",
                            kind.entity_label()
                        )));
                    }

                    TrashRepo::archive(&mut *conn, kind, id, ctx.actor_id, note.as_deref())
                        .await?;
                    AuditRepo::append(
                        conn,
                        Some(ctx.actor_id),
                        actions::ARCHIVED,
                        kind,
                        id,
                        Some(serde_json::json!({ "note": note })),
                    )
                    .await?;
                    Ok::<_, EngineError>(())
                }
                .boxed()
            })
            .await?;

        self.invalidate_kind(kind);
        Ok(())
    }

    /// Restore an archived entity. The status column was never touched by
    /// archival, so the entity resumes its exact pre-archive status, which
    /// is returned (kinds without a status lifecycle return `None`).
    pub async fn restore(&self, kind: EntityKind, id: DbId) -> EngineResult<Option<String>> {
        let status = self
            .store()
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let state = TrashRepo::soft_state(&mut *conn, kind, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found(kind.entity_label(), id))?;
                    if state.is_removed() {
                        return Err(EngineError::conflict(format!(
                            "{} {id} has been removed; removal is not restorable",
                            kind.entity_label()
                        )));
                    }
                    if !state.is_archived() {
                        return Err(EngineError::conflict(format!(
                            "{} {id} is not archived",
                            kind.entity_label()
                        )));
                    }

                    TrashRepo::restore(&mut *conn, kind, id).await?;
                    let status = TrashRepo::status_text(&mut *conn, kind, id).await?;
                    AuditRepo::append(
                        conn,
                        None,
                        actions::RESTORED,
                        kind,
                        id,
                        Some(serde_json::json!({ "status": status.clone() })),
                    )
                    .await?;
                    Ok::<_, EngineError>(status)
                }
                .boxed()
            })
            .await?;

        self.invalidate_kind(kind);
        Ok(status)
    }

    /// Remove an entity (irreversible, mandatory reason). The row stays in
    /// place for audit; it only leaves the database through [`purge`].
    ///
    /// [`purge`]: TransitionEngine::purge
    pub async fn remove(
        &self,
        kind: EntityKind,
        id: DbId,
        ctx: ActorContext,
        reason: String,
    ) -> EngineResult<()> {
        if reason.trim().is_empty() {
            return Err(EngineError::validation("Removal reason is required"));
        }

        self.store()
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let state = TrashRepo::soft_state(&mut *conn, kind, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found(kind.entity_label(), id))?;
                    if state.is_removed() {
                        return Err(EngineError::conflict(format!(
                            "{} {id} is already removed",
                            kind.entity_label()
                        )));
                    }

                    TrashRepo::remove(&mut *conn, kind, id, ctx.actor_id, &reason).await?;
                    AuditRepo::append(
                        conn,
                        Some(ctx.actor_id),
                        actions::REMOVED,
                        kind,
                        id,
                        Some(serde_json::json!({ "reason": reason })),
                    )
                    .await?;
                    Ok::<_, EngineError>(())
                }
                .boxed()
            })
            .await?;

        self.invalidate_kind(kind);
        Ok(())
    }

    /// Physically delete a previously-removed row. The referential rules
    /// preserve dependent history (references go null, cascades apply).
    pub async fn purge(&self, kind: EntityKind, id: DbId) -> EngineResult<()> {
        self.store()
            .run_in_transaction(move |conn: &mut SqliteConnection| {
                async move {
                    let state = TrashRepo::soft_state(&mut *conn, kind, id)
                        .await?
                        .ok_or_else(|| EngineError::not_found(kind.entity_label(), id))?;
                    if !state.is_removed() {
                        return Err(EngineError::conflict(format!(
                            "{} {id} must be removed before it can be purged",
                            kind.entity_label()
                        )));
                    }

                    TrashRepo::purge(&mut *conn, kind, id).await?;
                    AuditRepo::append(conn, None, actions::PURGED, kind, id, None).await?;
                    Ok::<_, EngineError>(())
                }
                .boxed()
            })
            .await?;

        self.invalidate_kind(kind);
        Ok(())
    }

    /// List hidden (archived or removed) rows for the admin trash page.
    pub async fn list_hidden(
        &self,
        kind: Option<EntityKind>,
    ) -> EngineResult<Vec<HiddenItem>> {
        let items = TrashRepo::list_hidden(self.store().reader(), kind).await?;
        Ok(items)
    }

    fn invalidate_kind(&self, kind: EntityKind) {
        let namespace = match kind {
            EntityKind::Animals => namespaces::ANIMALS,
            EntityKind::RescueReports => namespaces::RESCUES,
            EntityKind::AdoptionRequests => namespaces::ADOPTIONS,
            // User mutations only affect dashboard-adjacent views.
            EntityKind::Users => namespaces::DASHBOARD,
        };
        self.cache().invalidate(namespace);
        self.cache().invalidate(namespaces::DASHBOARD);
    }
}
