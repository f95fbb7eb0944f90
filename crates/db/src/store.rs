//! [`PgStore`]: the PostgreSQL implementation of the core store traits.
//!
//! Unique violations that carry domain meaning are translated into the
//! matching [`CoreError`] variants; any other database failure is logged and
//! surfaces as [`CoreError::Internal`].

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use studio_core::attendance::{check_clock_in, AttendanceRecord};
use studio_core::catalog::{AddOn, Session};
use studio_core::error::CoreError;
use studio_core::ledger::PaymentState;
use studio_core::store::{AttendanceStore, BookingStore, CatalogStore};
use studio_core::transaction::{StudioStatus, Transaction, TransactionDraft};
use studio_core::types::{DbId, Timestamp};

use crate::repositories::{AttendanceRepo, CatalogRepo, TransactionRepo};

const UQ_SLOT: &str = "uq_session_bookings_slot";
const UQ_ATTENDANCE_DAY: &str = "uq_attendance_user_day";
const UQ_ATTENDANCE_OPEN: &str = "uq_attendance_open_per_user";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find which requested slot lost the race after a slot unique violation.
    async fn taken_slot(&self, draft: &TransactionDraft) -> Result<CoreError, CoreError> {
        for booking in &draft.session_bookings {
            let booked = TransactionRepo::find_sessions_booked_on(&self.pool, booking.date)
                .await
                .map_err(internal)?;
            if booked.contains(&booking.session_id) {
                return Ok(CoreError::SlotConflict {
                    session_id: booking.session_id,
                    date: booking.date,
                });
            }
        }
        Ok(CoreError::Conflict(
            "A requested session was booked concurrently".into(),
        ))
    }

    /// Classify a clock-in that lost to a concurrent write.
    async fn lost_clock_in(
        &self,
        user_id: DbId,
        work_date: NaiveDate,
    ) -> Result<CoreError, CoreError> {
        let todays = self.find_attendance_for_day(user_id, work_date).await?;
        let open = self.find_open_attendance(user_id).await?;
        Ok(check_clock_in(todays.as_ref(), open.as_ref())
            .err()
            .unwrap_or(CoreError::AlreadyClockedIn))
    }
}

/// Name of the unique constraint violated by `err`, if that is what it is.
fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            db_err.constraint()
        }
        _ => None,
    }
}

fn internal(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Database error");
    CoreError::Internal("Database error".into())
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_sessions(&self) -> Result<Vec<Session>, CoreError> {
        let rows = CatalogRepo::list_sessions(&self.pool).await.map_err(internal)?;
        Ok(rows.into_iter().map(Session::from).collect())
    }

    async fn list_add_ons(&self) -> Result<Vec<AddOn>, CoreError> {
        let rows = CatalogRepo::list_add_ons(&self.pool).await.map_err(internal)?;
        Ok(rows.into_iter().map(AddOn::from).collect())
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn find_sessions_booked_on(&self, date: NaiveDate) -> Result<HashSet<DbId>, CoreError> {
        let ids = TransactionRepo::find_sessions_booked_on(&self.pool, date)
            .await
            .map_err(internal)?;
        Ok(ids.into_iter().collect())
    }

    async fn create_transaction(
        &self,
        draft: &TransactionDraft,
    ) -> Result<Transaction, CoreError> {
        match TransactionRepo::create(&self.pool, draft).await {
            Ok(transaction) => Ok(transaction),
            Err(err) if unique_violation(&err) == Some(UQ_SLOT) => {
                tracing::info!(user_id = draft.user_id, "Slot taken by a concurrent booking");
                Err(self.taken_slot(draft).await?)
            }
            Err(err) => Err(internal(err)),
        }
    }

    async fn get_transaction(&self, id: DbId) -> Result<Option<Transaction>, CoreError> {
        TransactionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(internal)
    }

    async fn update_payment(
        &self,
        id: DbId,
        expected: &PaymentState,
        next: &PaymentState,
    ) -> Result<Option<Transaction>, CoreError> {
        TransactionRepo::update_payment(&self.pool, id, expected, next)
            .await
            .map_err(internal)
    }

    async fn update_studio_status(
        &self,
        id: DbId,
        status: StudioStatus,
    ) -> Result<Option<Transaction>, CoreError> {
        TransactionRepo::update_studio_status(&self.pool, id, status)
            .await
            .map_err(internal)
    }
}

#[async_trait]
impl AttendanceStore for PgStore {
    async fn find_open_attendance(
        &self,
        user_id: DbId,
    ) -> Result<Option<AttendanceRecord>, CoreError> {
        let row = AttendanceRepo::find_open(&self.pool, user_id)
            .await
            .map_err(internal)?;
        Ok(row.map(AttendanceRecord::from))
    }

    async fn find_attendance_for_day(
        &self,
        user_id: DbId,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, CoreError> {
        let row = AttendanceRepo::find_for_day(&self.pool, user_id, work_date)
            .await
            .map_err(internal)?;
        Ok(row.map(AttendanceRecord::from))
    }

    async fn create_attendance(
        &self,
        user_id: DbId,
        work_date: NaiveDate,
        clock_in: Timestamp,
    ) -> Result<AttendanceRecord, CoreError> {
        match AttendanceRepo::create(&self.pool, user_id, work_date, clock_in).await {
            Ok(row) => Ok(row.into()),
            Err(err)
                if matches!(
                    unique_violation(&err),
                    Some(UQ_ATTENDANCE_DAY) | Some(UQ_ATTENDANCE_OPEN)
                ) =>
            {
                tracing::info!(user_id, %work_date, "Clock-in lost to a concurrent write");
                Err(self.lost_clock_in(user_id, work_date).await?)
            }
            Err(err) => Err(internal(err)),
        }
    }

    async fn close_attendance(
        &self,
        id: DbId,
        clock_out: Timestamp,
    ) -> Result<Option<AttendanceRecord>, CoreError> {
        let row = AttendanceRepo::close(&self.pool, id, clock_out)
            .await
            .map_err(internal)?;
        Ok(row.map(AttendanceRecord::from))
    }
}
