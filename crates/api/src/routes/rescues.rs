//! Route definitions for the `/rescues` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::rescues;
use crate::state::AppState;

/// Routes mounted at `/rescues`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rescues::list_reports).post(rescues::create_report))
        .route("/{id}", get(rescues::get_report))
        .route("/{id}/transition", post(rescues::transition_report))
}
