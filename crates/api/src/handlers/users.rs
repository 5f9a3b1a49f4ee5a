//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use pawres_core::limits::MIN_PASSWORD_LENGTH;
use pawres_core::types::{ActorContext, DbId};
use pawres_db::models::user::{CreateUser, User};
use pawres_db::repositories::UserRepo;

use crate::auth::password;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    /// Admin creating the account, when not self-registration.
    pub actor_id: Option<DbId>,
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    let password_hash = match body.password.as_deref() {
        Some(plain) => {
            password::validate_password_strength(plain, MIN_PASSWORD_LENGTH)
                .map_err(AppError::BadRequest)?;
            let hash = password::hash_password(plain)
                .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))?;
            Some(hash)
        }
        None => None,
    };

    let user = state
        .engine
        .create_user(
            CreateUser {
                name: body.name,
                email: body.email,
                phone: body.phone,
                password_hash,
                role: body.role,
            },
            body.actor_id.map(ActorContext::new),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = UserRepo::list(state.store.reader()).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(state.store.reader(), id)
        .await?
        .ok_or(pawres_core::CoreError::NotFound { entity: "User", id })?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/users/{id}/disable
pub async fn disable_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let changed = UserRepo::set_disabled(state.store.writer(), id, true).await?;
    if changed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(pawres_core::CoreError::NotFound { entity: "User", id }.into())
    }
}
