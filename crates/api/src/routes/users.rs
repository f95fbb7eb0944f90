//! Route definitions for the `/users` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET  /             -> list_users
/// POST /             -> create_user
/// PUT  /{id}/role    -> change_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/{id}/role", put(users::change_role))
}
