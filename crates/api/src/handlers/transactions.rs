//! Handlers for the `/transactions` resource.
//!
//! Creation and payment rules live in [`BookingService`]; these handlers
//! only check capabilities, decode input and wrap results.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use studio_core::error::CoreError;
use studio_core::roles::Capability;
use studio_core::service::{BookingService, CreatedTransaction};
use studio_core::store::BookingStore;
use studio_core::transaction::{NewTransaction, StudioStatus, Transaction};
use studio_core::types::{DbId, Rupiah};
use studio_db::models::report::TransactionPage;
use studio_db::repositories::ReportRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ReportParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /transactions/{id}`.
///
/// `amount` settles the remaining balance; `studio_status` moves the session
/// along. At least one must be present.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub amount: Option<Rupiah>,
    pub studio_status: Option<StudioStatus>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/transactions?start_date=&end_date=&page=&limit=
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<DataResponse<TransactionPage>>> {
    user.require(Capability::ViewTransactionReport)?;
    params.validate_range(&state.config.calendar)?;

    let page = ReportRepo::transactions(
        &state.pool,
        &state.config.calendar,
        params.start_date,
        params.end_date,
        params.pagination(),
    )
    .await?;

    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/transactions
///
/// Returns 201 with the stored transaction and, for cash, the change due.
pub async fn create_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<NewTransaction>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedTransaction>>)> {
    user.require(Capability::ManageTransactions)?;

    let service = BookingService::new(&state.store, state.config.calendar);
    let created = service.create_transaction(user.user_id, &input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/transactions/{id}
pub async fn get_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Transaction>>> {
    user.require(Capability::ManageTransactions)?;

    let transaction = state
        .store
        .get_transaction(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Transaction",
            id,
        }))?;

    Ok(Json(DataResponse { data: transaction }))
}

/// PUT /api/v1/transactions/{id}
pub async fn update_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTransactionRequest>,
) -> AppResult<Json<DataResponse<Transaction>>> {
    user.require(Capability::ManageTransactions)?;

    let service = BookingService::new(&state.store, state.config.calendar);
    let transaction = service
        .update_transaction(id, input.amount, input.studio_status)
        .await?;

    Ok(Json(DataResponse { data: transaction }))
}
