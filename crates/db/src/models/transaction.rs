//! Rows of `transactions`, `session_bookings` and `add_on_items`.

use chrono::NaiveDate;
use sqlx::FromRow;
use studio_core::error::CoreError;
use studio_core::transaction::{
    AddOnLineItem, PaymentMethod, PaymentStatus, SessionBooking, StudioStatus, Transaction,
};
use studio_core::types::{DbId, Rupiah, Timestamp};

/// Header row of a transaction, without its line items.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: DbId,
    pub user_id: DbId,
    pub customer_name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub total_price: Rupiah,
    pub amount_paid: Rupiah,
    pub amount_remaining: Rupiah,
    pub payment_method: String,
    pub payment_status: String,
    pub studio_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TransactionRow {
    /// Attach line items and parse the status labels.
    pub fn into_domain(
        self,
        session_bookings: Vec<SessionBooking>,
        add_on_items: Vec<AddOnLineItem>,
    ) -> Result<Transaction, CoreError> {
        Ok(Transaction {
            id: self.id,
            user_id: self.user_id,
            customer_name: self.customer_name,
            phone: self.phone,
            notes: self.notes,
            created_at: self.created_at,
            total_price: self.total_price,
            amount_paid: self.amount_paid,
            amount_remaining: self.amount_remaining,
            payment_method: PaymentMethod::parse(&self.payment_method)?,
            payment_status: PaymentStatus::parse(&self.payment_status)?,
            studio_status: StudioStatus::parse(&self.studio_status)?,
            session_bookings,
            add_on_items,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionBookingRow {
    pub transaction_id: DbId,
    pub session_id: DbId,
    pub session_date: NaiveDate,
}

impl From<&SessionBookingRow> for SessionBooking {
    fn from(row: &SessionBookingRow) -> Self {
        SessionBooking {
            session_id: row.session_id,
            date: row.session_date,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AddOnItemRow {
    pub transaction_id: DbId,
    pub add_on_id: DbId,
    pub quantity: i32,
    pub unit_price: Rupiah,
}

impl From<&AddOnItemRow> for AddOnLineItem {
    fn from(row: &AddOnItemRow) -> Self {
        AddOnLineItem {
            add_on_id: row.add_on_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}
