//! Route definitions for the `/catalog` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/catalog`.
///
/// ```text
/// GET /sessions                    -> list_sessions
/// GET /add-ons                     -> list_add_ons
/// GET /availability?date=          -> availability
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(catalog::list_sessions))
        .route("/add-ons", get(catalog::list_add_ons))
        .route("/availability", get(catalog::availability))
}
