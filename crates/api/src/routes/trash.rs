//! Route definitions for the `/trash` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::trash;
use crate::state::AppState;

/// Routes mounted at `/trash`.
///
/// ```text
/// GET    /                        -> list_hidden  (?kind=entity_kind)
/// POST   /{kind}/{id}/archive     -> archive
/// POST   /{kind}/{id}/restore     -> restore
/// POST   /{kind}/{id}/remove      -> remove
/// DELETE /{kind}/{id}/purge       -> purge
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trash::list_hidden))
        .route("/{kind}/{id}/archive", post(trash::archive))
        .route("/{kind}/{id}/restore", post(trash::restore))
        .route("/{kind}/{id}/remove", post(trash::remove))
        .route("/{kind}/{id}/purge", delete(trash::purge))
}
