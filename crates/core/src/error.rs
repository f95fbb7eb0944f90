use chrono::NaiveDate;

use crate::types::{DbId, Rupiah};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed on {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Session {session_id} is already booked on {date}")]
    SlotConflict { session_id: DbId, date: NaiveDate },

    #[error("Transaction {transaction_id} is already fully paid")]
    AlreadySettled { transaction_id: DbId },

    #[error("Payment must settle the remaining balance exactly: expected {expected}, got {actual}")]
    AmountMismatch { expected: Rupiah, actual: Rupiah },

    #[error("Already clocked in")]
    AlreadyClockedIn,

    #[error("Attendance for today is already complete")]
    AlreadyCompleted,

    #[error("No open attendance record to clock out")]
    NoOpenRecord,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::Validation`] on `field`.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::Validation {
            field,
            reason: reason.into(),
        }
    }
}
