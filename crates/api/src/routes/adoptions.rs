//! Route definitions for the `/adoptions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::adoptions;
use crate::state::AppState;

/// Routes mounted at `/adoptions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(adoptions::list_requests).post(adoptions::create_request),
        )
        .route("/{id}", get(adoptions::get_request))
        .route("/{id}/approve", post(adoptions::approve_request))
        .route("/{id}/deny", post(adoptions::deny_request))
        .route("/{id}/cancel", post(adoptions::cancel_request))
}
