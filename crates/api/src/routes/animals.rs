//! Route definitions for the `/animals` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::animals;
use crate::state::AppState;

/// Routes mounted at `/animals`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(animals::list_animals).post(animals::create_animal))
        .route("/classify", post(animals::classify_photo))
        .route("/{id}", get(animals::get_animal))
        .route("/{id}/transition", post(animals::transition_animal))
}
