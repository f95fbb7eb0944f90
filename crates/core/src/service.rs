//! Booking service: availability, transaction creation and payment updates.
//!
//! Every call re-reads the state it needs from the store; nothing is cached
//! between calls.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::booking::{availability, BookedSlots};
use crate::calendar::StudioCalendar;
use crate::catalog::CatalogSnapshot;
use crate::error::CoreError;
use crate::ledger::apply_payment;
use crate::store::{BookingStore, CatalogStore};
use crate::transaction::{build_transaction, NewTransaction, StudioStatus, Transaction};
use crate::types::{DbId, Rupiah};

/// A freshly stored transaction plus the change owed for cash payments.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedTransaction {
    pub transaction: Transaction,
    pub change_due: Option<Rupiah>,
}

pub struct BookingService<'a, S> {
    store: &'a S,
    calendar: StudioCalendar,
}

impl<'a, S> BookingService<'a, S>
where
    S: CatalogStore + BookingStore,
{
    pub fn new(store: &'a S, calendar: StudioCalendar) -> Self {
        Self { store, calendar }
    }

    /// Availability of every catalog session on `date`.
    pub async fn check_availability(
        &self,
        date: NaiveDate,
    ) -> Result<BTreeMap<DbId, bool>, CoreError> {
        let sessions = self.store.list_sessions().await?;
        let booked = self.store.find_sessions_booked_on(date).await?;
        Ok(availability(&sessions, &booked))
    }

    pub async fn is_slot_available(
        &self,
        session_id: DbId,
        date: NaiveDate,
    ) -> Result<bool, CoreError> {
        let booked = self.store.find_sessions_booked_on(date).await?;
        Ok(!booked.contains(&session_id))
    }

    pub async fn create_transaction(
        &self,
        user_id: DbId,
        request: &NewTransaction,
    ) -> Result<CreatedTransaction, CoreError> {
        let catalog = CatalogSnapshot::new(
            self.store.list_sessions().await?,
            self.store.list_add_ons().await?,
        );

        let mut booked = BookedSlots::new();
        for date in request.booking_dates(&self.calendar) {
            let ids = self.store.find_sessions_booked_on(date).await?;
            booked.extend_day(date, ids);
        }

        let built = build_transaction(user_id, request, &catalog, &booked, &self.calendar)?;
        let transaction = self.store.create_transaction(&built.draft).await?;

        tracing::info!(
            transaction_id = transaction.id,
            user_id,
            total_price = transaction.total_price,
            amount_paid = transaction.amount_paid,
            payment_status = transaction.payment_status.as_str(),
            sessions = transaction.session_bookings.len(),
            "Transaction created"
        );

        Ok(CreatedTransaction {
            transaction,
            change_due: built.change_due,
        })
    }

    /// Pay off the remaining balance of a transaction.
    pub async fn settle_payment(
        &self,
        transaction_id: DbId,
        amount: Rupiah,
    ) -> Result<Transaction, CoreError> {
        let current = self.load(transaction_id).await?;
        let next = apply_payment(&current, amount)?;

        if let Some(updated) = self
            .store
            .update_payment(transaction_id, &current.payment_state(), &next)
            .await?
        {
            tracing::info!(
                transaction_id,
                amount,
                payment_status = updated.payment_status.as_str(),
                "Payment settled"
            );
            return Ok(updated);
        }

        // The row changed under us; judge the payment against the fresh state.
        let fresh = self.load(transaction_id).await?;
        apply_payment(&fresh, amount)?;
        Err(CoreError::Conflict(format!(
            "Transaction {transaction_id} was modified concurrently"
        )))
    }

    pub async fn set_studio_status(
        &self,
        transaction_id: DbId,
        status: StudioStatus,
    ) -> Result<Transaction, CoreError> {
        let updated = self
            .store
            .update_studio_status(transaction_id, status)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Transaction",
                id: transaction_id,
            })?;
        tracing::info!(transaction_id, status = status.as_str(), "Studio status updated");
        Ok(updated)
    }

    /// Apply a settlement and/or a studio-status change in one request.
    ///
    /// The settlement runs first so a rejected payment leaves the status
    /// untouched.
    pub async fn update_transaction(
        &self,
        transaction_id: DbId,
        amount: Option<Rupiah>,
        studio_status: Option<StudioStatus>,
    ) -> Result<Transaction, CoreError> {
        if amount.is_none() && studio_status.is_none() {
            return Err(CoreError::validation(
                "body",
                "nothing to update: provide amount and/or studio_status",
            ));
        }

        let mut latest = None;
        if let Some(amount) = amount {
            latest = Some(self.settle_payment(transaction_id, amount).await?);
        }
        if let Some(status) = studio_status {
            latest = Some(self.set_studio_status(transaction_id, status).await?);
        }
        latest.ok_or_else(|| CoreError::Internal("no update applied".into()))
    }

    async fn load(&self, transaction_id: DbId) -> Result<Transaction, CoreError> {
        self.store
            .get_transaction(transaction_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Transaction",
                id: transaction_id,
            })
    }
}
