//! Handlers for the `/adoptions` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use pawres_core::types::{ActorContext, DbId};
use pawres_db::models::adoption_request::{AdoptionRequest, CreateAdoptionRequest};
use pawres_db::repositories::AdoptionRequestRepo;
use pawres_engine::ApprovalOutcome;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for approval.
#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub actor_id: DbId,
    pub message: Option<String>,
}

/// Request body for an admin denial. The reason is mandatory.
#[derive(Debug, Deserialize)]
pub struct DenyBody {
    pub actor_id: DbId,
    pub reason: String,
    pub message: Option<String>,
}

/// Request body for a requester withdrawal.
#[derive(Debug, Deserialize)]
pub struct CancelBody {
    pub actor_id: DbId,
}

/// POST /api/v1/adoptions
pub async fn create_request(
    State(state): State<AppState>,
    Json(input): Json<CreateAdoptionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AdoptionRequest>>)> {
    let request = state.engine.create_adoption_request(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/adoptions
pub async fn list_requests(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AdoptionRequest>>>> {
    let requests = AdoptionRequestRepo::list_active(state.store.reader()).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/adoptions/{id}
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdoptionRequest>>> {
    let request = AdoptionRequestRepo::find_by_id(state.store.reader(), id)
        .await?
        .ok_or(pawres_core::CoreError::NotFound {
            entity: "AdoptionRequest",
            id,
        })?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/adoptions/{id}/approve
///
/// Returns the ids of sibling requests that were auto-denied. A 409 means
/// the animal is no longer available (the double-approval race, resolved).
pub async fn approve_request(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ApproveBody>,
) -> AppResult<Json<DataResponse<ApprovalOutcome>>> {
    let outcome = state
        .engine
        .approve_adoption(id, ActorContext::new(body.actor_id), body.message)
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/adoptions/{id}/deny
pub async fn deny_request(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<DenyBody>,
) -> AppResult<Json<DataResponse<AdoptionRequest>>> {
    let request = state
        .engine
        .deny_adoption(id, ActorContext::new(body.actor_id), body.reason, body.message)
        .await?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/adoptions/{id}/cancel
pub async fn cancel_request(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<CancelBody>,
) -> AppResult<Json<DataResponse<AdoptionRequest>>> {
    let request = state
        .engine
        .cancel_adoption(id, ActorContext::new(body.actor_id))
        .await?;
    Ok(Json(DataResponse { data: request }))
}
