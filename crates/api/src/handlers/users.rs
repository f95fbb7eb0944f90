//! Handlers for the `/users` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use studio_core::error::CoreError;
use studio_core::roles::Role;
use studio_core::types::DbId;
use studio_db::models::user::{CreateUser, UserResponse};
use studio_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3 to 50 characters"))]
    pub username: String,
    pub password: String,
    /// `admin` or `user`; defaults to `user`.
    pub role: Option<String>,
}

/// Request body for `PUT /users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct UserPage {
    pub items: Vec<UserResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users?page=&limit=
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<UserPage>>> {
    let pagination = params.resolve();

    let users = UserRepo::list(&state.pool, pagination.limit, pagination.offset()).await?;
    let total = UserRepo::count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: UserPage {
            items: users.iter().map(UserResponse::from).collect(),
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages(total),
        },
    }))
}

/// POST /api/v1/users
///
/// Create a staff account. A taken username maps to 409 via `uq_users_username`.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let username = input.username.trim().to_string();
    input.validate()?;
    if username.chars().count() < 3 {
        return Err(AppError::Core(CoreError::validation(
            "username",
            "username must be 3 to 50 characters",
        )));
    }

    validate_password_strength(&input.password, state.config.password_min_length)
        .map_err(|msg| AppError::Core(CoreError::validation("password", msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let role = match input.role.as_deref() {
        Some(role) => Role::parse(role)?,
        None => Role::User,
    };
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            password_hash,
            role: role.as_str().to_string(),
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        role = role.as_str(),
        created_by = admin.user_id,
        "User created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// PUT /api/v1/users/{id}/role
pub async fn change_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeRoleRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let role = Role::parse(&input.role)?;
    let user = UserRepo::update_role(&state.pool, id, role.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        changed_by = admin.user_id,
        "User role changed"
    );

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}
