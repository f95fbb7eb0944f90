//! Route definitions for the `/attendance` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// GET  /            -> list_attendance (admin)
/// POST /clock-in    -> clock_in
/// POST /clock-out   -> clock_out
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(attendance::list_attendance))
        .route("/clock-in", post(attendance::clock_in))
        .route("/clock-out", post(attendance::clock_out))
}
