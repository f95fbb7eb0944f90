//! Handlers for the read-only `/catalog` resource.

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use studio_core::catalog::{AddOn, Session};
use studio_core::service::BookingService;
use studio_core::store::CatalogStore;
use studio_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::AvailabilityParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SlotAvailability {
    pub session_id: DbId,
    pub available: bool,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailability>,
}

/// GET /api/v1/catalog/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Session>>>> {
    let sessions = state.store.list_sessions().await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/catalog/add-ons
pub async fn list_add_ons(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<AddOn>>>> {
    let add_ons = state.store.list_add_ons().await?;
    Ok(Json(DataResponse { data: add_ons }))
}

/// GET /api/v1/catalog/availability?date=YYYY-MM-DD
///
/// Without `date`, reports the current studio day.
pub async fn availability(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<DataResponse<AvailabilityResponse>>> {
    let calendar = state.config.calendar;
    let date = params.date.unwrap_or_else(|| calendar.today());
    let service = BookingService::new(&state.store, calendar);

    let slots = service
        .check_availability(date)
        .await?
        .into_iter()
        .map(|(session_id, available)| SlotAvailability {
            session_id,
            available,
        })
        .collect();

    Ok(Json(DataResponse {
        data: AvailabilityResponse { date, slots },
    }))
}
