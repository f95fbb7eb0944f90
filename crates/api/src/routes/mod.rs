pub mod attendance;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod transactions;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
///
/// /catalog/sessions                session catalog
/// /catalog/add-ons                 add-on catalog
/// /catalog/availability            slot availability for a day
///
/// /transactions                    report (admin), create
/// /transactions/{id}               get, settle payment / set studio status
///
/// /attendance                      report (admin)
/// /attendance/clock-in             open today's record
/// /attendance/clock-out            close the open record
///
/// /users                           list, create (admin only)
/// /users/{id}/role                 change role (admin only)
///
/// /dashboard/summary               monthly revenue, today's bookings
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/catalog", catalog::router())
        .nest("/transactions", transactions::router())
        .nest("/attendance", attendance::router())
        .nest("/users", users::router())
        .nest("/dashboard", dashboard::router())
}
