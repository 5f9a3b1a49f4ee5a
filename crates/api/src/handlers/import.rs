//! Handlers for the `/import` resource.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use pawres_core::types::{ActorContext, DbId};
use pawres_engine::ImportOutcome;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for a CSV animal import.
#[derive(Debug, Deserialize)]
pub struct ImportBody {
    pub actor_id: DbId,
    /// CSV text with headers `name, animal_type, breed, age, health_status,
    /// photo`. Legacy status strings are normalized during import.
    pub data: String,
}

/// POST /api/v1/import/animals
pub async fn import_animals(
    State(state): State<AppState>,
    Json(body): Json<ImportBody>,
) -> AppResult<Json<DataResponse<ImportOutcome>>> {
    let outcome = state
        .engine
        .import_animals_csv(body.data.as_bytes(), ActorContext::new(body.actor_id))
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}
