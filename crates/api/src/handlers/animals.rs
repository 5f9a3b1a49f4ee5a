//! Handlers for the `/animals` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use pawres_core::types::{ActorContext, DbId};
use pawres_db::models::animal::{Animal, CreateAnimal};
use pawres_db::models::status::AnimalStatus;
use pawres_db::repositories::AnimalRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for direct animal entry.
#[derive(Debug, Deserialize)]
pub struct CreateAnimalBody {
    #[serde(flatten)]
    pub input: CreateAnimal,
    pub actor_id: DbId,
}

/// Query parameters for the animal listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// When true, return only adoptable animals (served from cache).
    #[serde(default)]
    pub available: bool,
}

/// Request body for an animal health transition.
#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    pub target_status: AnimalStatus,
    pub actor_id: DbId,
}

/// POST /api/v1/animals
pub async fn create_animal(
    State(state): State<AppState>,
    Json(body): Json<CreateAnimalBody>,
) -> AppResult<(StatusCode, Json<DataResponse<Animal>>)> {
    let animal = state
        .engine
        .create_animal(body.input, ActorContext::new(body.actor_id))
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: animal })))
}

/// GET /api/v1/animals?available=true
pub async fn list_animals(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<Animal>>>> {
    let animals = if query.available {
        state.engine.adoptable_animals().await?
    } else {
        AnimalRepo::list_active(state.store.reader()).await?
    };
    Ok(Json(DataResponse { data: animals }))
}

/// GET /api/v1/animals/{id}
pub async fn get_animal(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Animal>>> {
    let animal = AnimalRepo::find_by_id(state.store.reader(), id)
        .await?
        .ok_or(pawres_core::CoreError::NotFound {
            entity: "Animal",
            id,
        })?;
    Ok(Json(DataResponse { data: animal }))
}

/// Request body for a breed suggestion.
#[derive(Debug, Deserialize)]
pub struct ClassifyBody {
    /// Photo bytes, base64 or data-url encoded as the classifier expects.
    pub photo: String,
}

/// Response payload for a breed suggestion.
#[derive(Debug, serde::Serialize)]
pub struct ClassifySuggestion {
    pub species: String,
    pub breed: Option<String>,
    pub confidence: f32,
}

/// POST /api/v1/animals/classify
///
/// Ask the injected classifier for a species/breed suggestion. Callers apply
/// the suggestion to their create/update payloads; nothing is written here.
pub async fn classify_photo(
    State(state): State<AppState>,
    Json(body): Json<ClassifyBody>,
) -> AppResult<Json<DataResponse<ClassifySuggestion>>> {
    use pawres_core::classify::ClassifyError;

    let prediction = state
        .classifier
        .classify(body.photo.as_bytes())
        .await
        .map_err(|err| match err {
            ClassifyError::Unavailable(msg) => crate::error::AppError::ServiceUnavailable(msg),
            ClassifyError::UnsupportedImage(msg) => crate::error::AppError::BadRequest(msg),
        })?;

    Ok(Json(DataResponse {
        data: ClassifySuggestion {
            species: prediction.species,
            breed: prediction.breed,
            confidence: prediction.confidence,
        },
    }))
}

/// POST /api/v1/animals/{id}/transition
pub async fn transition_animal(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<TransitionBody>,
) -> AppResult<Json<DataResponse<Animal>>> {
    let animal = state
        .engine
        .transition_animal(id, body.target_status, ActorContext::new(body.actor_id))
        .await?;
    Ok(Json(DataResponse { data: animal }))
}
