//! Handlers for the `/trash` resource: the archive/removal subsystem.
//!
//! Archive is reversible; removal is not; purge physically deletes a
//! previously-removed row. All of it spans the four entity kinds.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use pawres_core::types::{ActorContext, DbId, EntityKind};
use pawres_db::repositories::trash_repo::HiddenItem;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the trash listing endpoint.
#[derive(Debug, Deserialize)]
pub struct TrashQuery {
    /// Optional entity kind filter (e.g. "animals", "rescue_reports").
    #[serde(rename = "kind")]
    pub entity_kind: Option<String>,
}

/// Request body for archiving.
#[derive(Debug, Deserialize)]
pub struct ArchiveBody {
    pub actor_id: DbId,
    pub note: Option<String>,
}

/// Request body for removal. The reason is mandatory.
#[derive(Debug, Deserialize)]
pub struct RemoveBody {
    pub actor_id: DbId,
    pub reason: String,
}

/// GET /api/v1/trash
pub async fn list_hidden(
    State(state): State<AppState>,
    Query(params): Query<TrashQuery>,
) -> AppResult<Json<DataResponse<Vec<HiddenItem>>>> {
    let kind = params
        .entity_kind
        .as_deref()
        .map(parse_kind)
        .transpose()?;
    let items = state.engine.list_hidden(kind).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/trash/{kind}/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, DbId)>,
    Json(body): Json<ArchiveBody>,
) -> AppResult<StatusCode> {
    let kind = parse_kind(&kind)?;
    state
        .engine
        .archive(kind, id, ActorContext::new(body.actor_id), body.note)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/trash/{kind}/{id}/restore
///
/// Returns the status the entity resumed.
pub async fn restore(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, DbId)>,
) -> AppResult<Json<serde_json::Value>> {
    let kind = parse_kind(&kind)?;
    let status = state.engine.restore(kind, id).await?;
    Ok(Json(serde_json::json!({
        "data": {
            "restored": true,
            "entity_kind": kind,
            "id": id,
            "status": status,
        }
    })))
}

/// POST /api/v1/trash/{kind}/{id}/remove
pub async fn remove(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, DbId)>,
    Json(body): Json<RemoveBody>,
) -> AppResult<StatusCode> {
    let kind = parse_kind(&kind)?;
    state
        .engine
        .remove(kind, id, ActorContext::new(body.actor_id), body.reason)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/trash/{kind}/{id}/purge
pub async fn purge(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let kind = parse_kind(&kind)?;
    state.engine.purge(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Validate that `kind` names one of the four entity kinds.
fn parse_kind(raw: &str) -> Result<EntityKind, AppError> {
    EntityKind::parse(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown entity kind: {raw}")))
}
