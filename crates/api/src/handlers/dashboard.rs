//! Handlers for the `/dashboard` resource.

use axum::extract::State;
use axum::Json;

use pawres_db::repositories::dashboard_repo::DashboardCounts;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
///
/// Summary counts, served from the short-TTL query cache.
pub async fn counts(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardCounts>>> {
    let counts = state.engine.dashboard_counts().await?;
    Ok(Json(DataResponse { data: counts }))
}
