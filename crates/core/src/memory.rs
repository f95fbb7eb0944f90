//! In-memory store for tests and local experiments.
//!
//! A single mutex guards all state, so check-and-insert sequences are atomic
//! in the same way the database constraints make them atomic in `studio-db`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::attendance::{check_clock_in, AttendanceRecord, STATUS_PRESENT};
use crate::catalog::{AddOn, Session};
use crate::error::CoreError;
use crate::ledger::PaymentState;
use crate::store::{AttendanceStore, BookingStore, CatalogStore};
use crate::transaction::{StudioStatus, Transaction, TransactionDraft};
use crate::types::{DbId, Timestamp};

#[derive(Default)]
struct Inner {
    sessions: Vec<Session>,
    add_ons: Vec<AddOn>,
    transactions: Vec<Transaction>,
    attendance: Vec<AttendanceRecord>,
    next_transaction_id: DbId,
    next_attendance_id: DbId,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(sessions: Vec<Session>, add_ons: Vec<AddOn>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                sessions,
                add_ons,
                ..Inner::default()
            }),
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_sessions(&self) -> Result<Vec<Session>, CoreError> {
        Ok(self.inner.lock().await.sessions.clone())
    }

    async fn list_add_ons(&self) -> Result<Vec<AddOn>, CoreError> {
        Ok(self.inner.lock().await.add_ons.clone())
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn find_sessions_booked_on(&self, date: NaiveDate) -> Result<HashSet<DbId>, CoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .transactions
            .iter()
            .flat_map(|t| t.session_bookings.iter())
            .filter(|b| b.date == date)
            .map(|b| b.session_id)
            .collect())
    }

    async fn create_transaction(
        &self,
        draft: &TransactionDraft,
    ) -> Result<Transaction, CoreError> {
        let mut inner = self.inner.lock().await;

        for wanted in &draft.session_bookings {
            let taken = inner
                .transactions
                .iter()
                .flat_map(|t| t.session_bookings.iter())
                .any(|b| b == wanted);
            if taken {
                return Err(CoreError::SlotConflict {
                    session_id: wanted.session_id,
                    date: wanted.date,
                });
            }
        }

        inner.next_transaction_id += 1;
        let transaction = Transaction {
            id: inner.next_transaction_id,
            user_id: draft.user_id,
            customer_name: draft.customer_name.clone(),
            phone: draft.phone.clone(),
            notes: draft.notes.clone(),
            created_at: Utc::now(),
            total_price: draft.total_price,
            amount_paid: draft.payment.amount_paid,
            amount_remaining: draft.payment.amount_remaining,
            payment_method: draft.payment_method,
            payment_status: draft.payment.payment_status,
            studio_status: draft.studio_status,
            session_bookings: draft.session_bookings.clone(),
            add_on_items: draft.add_on_items.clone(),
        };
        inner.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn get_transaction(&self, id: DbId) -> Result<Option<Transaction>, CoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.transactions.iter().find(|t| t.id == id).cloned())
    }

    async fn update_payment(
        &self,
        id: DbId,
        expected: &PaymentState,
        next: &PaymentState,
    ) -> Result<Option<Transaction>, CoreError> {
        let mut inner = self.inner.lock().await;
        let Some(tx) = inner.transactions.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if tx.payment_state() != *expected {
            return Ok(None);
        }
        tx.amount_paid = next.amount_paid;
        tx.amount_remaining = next.amount_remaining;
        tx.payment_status = next.payment_status;
        Ok(Some(tx.clone()))
    }

    async fn update_studio_status(
        &self,
        id: DbId,
        status: StudioStatus,
    ) -> Result<Option<Transaction>, CoreError> {
        let mut inner = self.inner.lock().await;
        Ok(inner
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .map(|tx| {
                tx.studio_status = status;
                tx.clone()
            }))
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn find_open_attendance(
        &self,
        user_id: DbId,
    ) -> Result<Option<AttendanceRecord>, CoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .attendance
            .iter()
            .filter(|r| r.user_id == user_id && r.is_open())
            .max_by_key(|r| r.clock_in)
            .cloned())
    }

    async fn find_attendance_for_day(
        &self,
        user_id: DbId,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, CoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .attendance
            .iter()
            .find(|r| r.user_id == user_id && r.work_date == work_date)
            .cloned())
    }

    async fn create_attendance(
        &self,
        user_id: DbId,
        work_date: NaiveDate,
        clock_in: Timestamp,
    ) -> Result<AttendanceRecord, CoreError> {
        let mut inner = self.inner.lock().await;
        let todays = inner
            .attendance
            .iter()
            .find(|r| r.user_id == user_id && r.work_date == work_date);
        let open = inner
            .attendance
            .iter()
            .filter(|r| r.user_id == user_id && r.is_open())
            .max_by_key(|r| r.clock_in);
        check_clock_in(todays, open)?;

        inner.next_attendance_id += 1;
        let record = AttendanceRecord {
            id: inner.next_attendance_id,
            user_id,
            work_date,
            clock_in,
            clock_out: None,
            status: STATUS_PRESENT.to_string(),
        };
        inner.attendance.push(record.clone());
        Ok(record)
    }

    async fn close_attendance(
        &self,
        id: DbId,
        clock_out: Timestamp,
    ) -> Result<Option<AttendanceRecord>, CoreError> {
        let mut inner = self.inner.lock().await;
        Ok(inner
            .attendance
            .iter_mut()
            .find(|r| r.id == id && r.is_open())
            .map(|r| {
                r.clock_out = Some(clock_out);
                r.clone()
            }))
    }
}
