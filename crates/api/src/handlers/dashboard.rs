//! Handler for the dashboard summary.

use axum::extract::State;
use axum::Json;
use studio_core::roles::Capability;
use studio_db::models::report::DashboardSummary;
use studio_db::repositories::ReportRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/summary
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    user.require(Capability::ViewDashboard)?;

    let calendar = state.config.calendar;
    let summary = ReportRepo::dashboard(&state.pool, &calendar, calendar.today()).await?;

    Ok(Json(DataResponse { data: summary }))
}
