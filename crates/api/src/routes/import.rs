//! Route definitions for the `/import` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::import;
use crate::state::AppState;

/// Routes mounted at `/import`.
pub fn router() -> Router<AppState> {
    Router::new().route("/animals", post(import::import_animals))
}
