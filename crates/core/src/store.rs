//! Persistence seams consumed by the core services.
//!
//! Implementations own all state. They must make
//! [`BookingStore::create_transaction`] all-or-nothing and reject a slot that
//! is already taken with [`CoreError::SlotConflict`], even when two requests
//! race past the advisory availability check.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::attendance::AttendanceRecord;
use crate::catalog::{AddOn, Session};
use crate::error::CoreError;
use crate::ledger::PaymentState;
use crate::transaction::{StudioStatus, Transaction, TransactionDraft};
use crate::types::{DbId, Timestamp};

/// Read-only access to the session and add-on catalogs.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_sessions(&self) -> Result<Vec<Session>, CoreError>;

    async fn list_add_ons(&self) -> Result<Vec<AddOn>, CoreError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Ids of every session booked on `date` by any transaction.
    async fn find_sessions_booked_on(&self, date: NaiveDate) -> Result<HashSet<DbId>, CoreError>;

    /// Insert the transaction with all of its bookings and add-on lines.
    async fn create_transaction(&self, draft: &TransactionDraft)
        -> Result<Transaction, CoreError>;

    async fn get_transaction(&self, id: DbId) -> Result<Option<Transaction>, CoreError>;

    /// Replace the payment columns, but only while they still equal `expected`.
    ///
    /// Returns `None` when the row is missing or has changed since it was read.
    async fn update_payment(
        &self,
        id: DbId,
        expected: &PaymentState,
        next: &PaymentState,
    ) -> Result<Option<Transaction>, CoreError>;

    /// Returns `None` when the transaction does not exist.
    async fn update_studio_status(
        &self,
        id: DbId,
        status: StudioStatus,
    ) -> Result<Option<Transaction>, CoreError>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Most recent record of `user_id` without a clock-out, on any day.
    async fn find_open_attendance(
        &self,
        user_id: DbId,
    ) -> Result<Option<AttendanceRecord>, CoreError>;

    async fn find_attendance_for_day(
        &self,
        user_id: DbId,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, CoreError>;

    /// Open a record. A concurrent duplicate fails the way
    /// [`check_clock_in`](crate::attendance::check_clock_in) would judge the
    /// records that beat it.
    async fn create_attendance(
        &self,
        user_id: DbId,
        work_date: NaiveDate,
        clock_in: Timestamp,
    ) -> Result<AttendanceRecord, CoreError>;

    /// Close an open record. Returns `None` if it was already closed.
    async fn close_attendance(
        &self,
        id: DbId,
        clock_out: Timestamp,
    ) -> Result<Option<AttendanceRecord>, CoreError>;
}
