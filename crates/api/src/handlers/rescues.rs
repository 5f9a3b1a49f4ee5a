//! Handlers for the `/rescues` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use pawres_core::types::{ActorContext, DbId};
use pawres_db::models::rescue_report::{CreateRescueReport, RescueReport};
use pawres_db::models::status::RescueStatus;
use pawres_db::repositories::RescueReportRepo;
use pawres_engine::RescueOutcome;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for a rescue report transition.
#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    pub target_status: RescueStatus,
    pub actor_id: DbId,
    pub message: Option<String>,
}

/// POST /api/v1/rescues
pub async fn create_report(
    State(state): State<AppState>,
    Json(input): Json<CreateRescueReport>,
) -> AppResult<(StatusCode, Json<DataResponse<RescueReport>>)> {
    let report = state.engine.create_rescue_report(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// GET /api/v1/rescues
pub async fn list_reports(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<RescueReport>>>> {
    let reports = RescueReportRepo::list_active(state.store.reader()).await?;
    Ok(Json(DataResponse { data: reports }))
}

/// GET /api/v1/rescues/{id}
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RescueReport>>> {
    let report = RescueReportRepo::find_by_id(state.store.reader(), id)
        .await?
        .ok_or(pawres_core::CoreError::NotFound {
            entity: "RescueReport",
            id,
        })?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/rescues/{id}/transition
pub async fn transition_report(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<TransitionBody>,
) -> AppResult<Json<DataResponse<RescueOutcome>>> {
    let outcome = state
        .engine
        .transition_rescue(
            id,
            body.target_status,
            ActorContext::new(body.actor_id),
            body.message,
        )
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}
