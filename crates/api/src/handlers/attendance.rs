//! Handlers for the `/attendance` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use studio_core::attendance::{AttendanceRecord, AttendanceService};
use studio_core::roles::Capability;
use studio_db::models::report::AttendancePage;
use studio_db::repositories::ReportRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::ReportParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/attendance?start_date=&end_date=&page=&limit=
///
/// With a date range the whole range is returned and `page`/`limit` are ignored.
pub async fn list_attendance(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<DataResponse<AttendancePage>>> {
    user.require(Capability::ViewAttendanceReport)?;
    params.validate_range(&state.config.calendar)?;

    let page = ReportRepo::attendance(
        &state.pool,
        &state.config.calendar,
        params.start_date,
        params.end_date,
        params.pagination(),
    )
    .await?;

    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/attendance/clock-in
pub async fn clock_in(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<(StatusCode, Json<DataResponse<AttendanceRecord>>)> {
    user.require(Capability::RecordAttendance)?;

    let service = AttendanceService::new(&state.store, state.config.calendar);
    let record = service.clock_in(user.user_id).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// POST /api/v1/attendance/clock-out
pub async fn clock_out(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<AttendanceRecord>>> {
    user.require(Capability::RecordAttendance)?;

    let service = AttendanceService::new(&state.store, state.config.calendar);
    let record = service.clock_out(user.user_id).await?;

    Ok(Json(DataResponse { data: record }))
}
