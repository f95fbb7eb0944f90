//! Payment ledger arithmetic.
//!
//! Invariants held by every [`PaymentState`] produced here:
//! `amount_remaining == total_price - amount_paid` and
//! `payment_status == Lunas` iff `amount_remaining <= 0`.
//!
//! Settlement is exact: a follow-up payment must equal the open balance.

use serde::Serialize;

use crate::error::CoreError;
use crate::transaction::{PaymentStatus, Transaction};
use crate::types::Rupiah;

/// The payment columns of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentState {
    pub amount_paid: Rupiah,
    pub amount_remaining: Rupiah,
    pub payment_status: PaymentStatus,
}

impl PaymentState {
    pub fn compute(total_price: Rupiah, amount_paid: Rupiah) -> Self {
        let amount_remaining = total_price - amount_paid;
        let payment_status = if amount_remaining <= 0 {
            PaymentStatus::Lunas
        } else {
            PaymentStatus::BelumLunas
        };
        Self {
            amount_paid,
            amount_remaining,
            payment_status,
        }
    }
}

/// Compute the state after paying `amount` towards `transaction`.
pub fn apply_payment(transaction: &Transaction, amount: Rupiah) -> Result<PaymentState, CoreError> {
    if transaction.payment_status == PaymentStatus::Lunas {
        return Err(CoreError::AlreadySettled {
            transaction_id: transaction.id,
        });
    }
    if amount != transaction.amount_remaining {
        return Err(CoreError::AmountMismatch {
            expected: transaction.amount_remaining,
            actual: amount,
        });
    }
    Ok(PaymentState::compute(
        transaction.total_price,
        transaction.amount_paid + amount,
    ))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::transaction::{PaymentMethod, StudioStatus};

    fn open_transaction(total: Rupiah, paid: Rupiah) -> Transaction {
        let state = PaymentState::compute(total, paid);
        Transaction {
            id: 5,
            user_id: 1,
            customer_name: "Sari".into(),
            phone: None,
            notes: None,
            created_at: Utc::now(),
            total_price: total,
            amount_paid: state.amount_paid,
            amount_remaining: state.amount_remaining,
            payment_method: PaymentMethod::Transfer,
            payment_status: state.payment_status,
            studio_status: StudioStatus::Booked,
            session_bookings: vec![],
            add_on_items: vec![],
        }
    }

    #[test]
    fn compute_status_boundaries() {
        assert_eq!(
            PaymentState::compute(170_000, 60_000).payment_status,
            PaymentStatus::BelumLunas
        );
        assert_eq!(
            PaymentState::compute(170_000, 170_000).payment_status,
            PaymentStatus::Lunas
        );
        let over = PaymentState::compute(100, 150);
        assert_eq!(over.amount_remaining, -50);
        assert_eq!(over.payment_status, PaymentStatus::Lunas);
    }

    #[test]
    fn exact_remainder_settles() {
        let tx = open_transaction(170_000, 60_000);
        let next = apply_payment(&tx, 110_000).unwrap();

        assert_eq!(next.amount_paid, 170_000);
        assert_eq!(next.amount_remaining, 0);
        assert_eq!(next.payment_status, PaymentStatus::Lunas);
    }

    #[test]
    fn partial_and_over_payments_rejected() {
        let tx = open_transaction(170_000, 60_000);

        assert_matches!(
            apply_payment(&tx, 50_000),
            Err(CoreError::AmountMismatch {
                expected: 110_000,
                actual: 50_000
            })
        );
        assert_matches!(
            apply_payment(&tx, 120_000),
            Err(CoreError::AmountMismatch {
                expected: 110_000,
                actual: 120_000
            })
        );
    }

    #[test]
    fn settled_transaction_rejects_payment() {
        let tx = open_transaction(85_000, 85_000);
        assert_matches!(
            apply_payment(&tx, 0),
            Err(CoreError::AlreadySettled { transaction_id: 5 })
        );
    }
}
