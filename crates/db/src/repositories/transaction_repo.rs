//! Repository for `transactions` and their line-item tables.
//!
//! Reads always return the full domain [`Transaction`] with bookings and
//! add-on lines attached.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres};
use studio_core::ledger::PaymentState;
use studio_core::transaction::{
    AddOnLineItem, SessionBooking, StudioStatus, Transaction, TransactionDraft,
};
use studio_core::types::{DbId, Rupiah, Timestamp};

use crate::models::decode_error;
use crate::models::transaction::{AddOnItemRow, SessionBookingRow, TransactionRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, customer_name, phone, notes, total_price, amount_paid, \
                       amount_remaining, payment_method, payment_status, studio_status, \
                       created_at, updated_at";

/// Optional half-open `[start, end)` filter on `created_at`.
const RANGE_FILTER: &str = "($1::timestamptz IS NULL OR created_at >= $1) \
                            AND ($2::timestamptz IS NULL OR created_at < $2)";

pub struct TransactionRepo;

impl TransactionRepo {
    // ── Writes ───────────────────────────────────────────────────────

    /// Insert a transaction with all of its bookings and add-on lines in one
    /// database transaction.
    ///
    /// A slot that is already booked fails with a unique violation on
    /// `uq_session_bookings_slot` and nothing is persisted.
    pub async fn create(pool: &PgPool, draft: &TransactionDraft) -> Result<Transaction, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO transactions
                (user_id, customer_name, phone, notes, total_price, amount_paid,
                 amount_remaining, payment_method, payment_status, studio_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let header = sqlx::query_as::<_, TransactionRow>(&query)
            .bind(draft.user_id)
            .bind(&draft.customer_name)
            .bind(&draft.phone)
            .bind(&draft.notes)
            .bind(draft.total_price)
            .bind(draft.payment.amount_paid)
            .bind(draft.payment.amount_remaining)
            .bind(draft.payment_method.as_str())
            .bind(draft.payment.payment_status.as_str())
            .bind(draft.studio_status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        for booking in &draft.session_bookings {
            sqlx::query(
                "INSERT INTO session_bookings (transaction_id, session_id, session_date)
                 VALUES ($1, $2, $3)",
            )
            .bind(header.id)
            .bind(booking.session_id)
            .bind(booking.date)
            .execute(&mut *tx)
            .await?;
        }

        for item in &draft.add_on_items {
            sqlx::query(
                "INSERT INTO add_on_items (transaction_id, add_on_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(header.id)
            .bind(item.add_on_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        header
            .into_domain(draft.session_bookings.clone(), draft.add_on_items.clone())
            .map_err(decode_error)
    }

    /// Write new payment columns only while the row still holds `expected`
    /// and is unsettled.
    ///
    /// Returns `None` when the row is missing or was changed concurrently.
    pub async fn update_payment(
        pool: &PgPool,
        id: DbId,
        expected: &PaymentState,
        next: &PaymentState,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!(
            "UPDATE transactions SET
                amount_paid = $2,
                amount_remaining = $3,
                payment_status = $4
             WHERE id = $1
               AND amount_paid = $5
               AND payment_status = $6
               AND payment_status = 'Belum Lunas'
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TransactionRow>(&query)
            .bind(id)
            .bind(next.amount_paid)
            .bind(next.amount_remaining)
            .bind(next.payment_status.as_str())
            .bind(expected.amount_paid)
            .bind(expected.payment_status.as_str())
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Self::attach_lines(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_studio_status(
        pool: &PgPool,
        id: DbId,
        status: StudioStatus,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query =
            format!("UPDATE transactions SET studio_status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, TransactionRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Self::attach_lines(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM transactions WHERE id = $1");
        let row = sqlx::query_as::<_, TransactionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Self::attach_lines(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Session ids booked on `date` across all transactions.
    pub async fn find_sessions_booked_on(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT session_id FROM session_bookings WHERE session_date = $1")
                .bind(date)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn count_bookings_on(pool: &PgPool, date: NaiveDate) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM session_bookings WHERE session_date = $1")
                .bind(date)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Newest-first page of transactions created within `[start, end)`.
    pub async fn list(
        pool: &PgPool,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE {RANGE_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, TransactionRow>(&query)
            .bind(start)
            .bind(end)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Self::attach_lines(pool, rows).await
    }

    /// Row count and revenue (`Σ total_price`) within `[start, end)`.
    pub async fn totals(
        pool: &PgPool,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<(i64, Rupiah), sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*), COALESCE(SUM(total_price), 0)::BIGINT
             FROM transactions
             WHERE {RANGE_FILTER}"
        );
        sqlx::query_as::<Postgres, (i64, Rupiah)>(&query)
            .bind(start)
            .bind(end)
            .fetch_one(pool)
            .await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// Load line items for `rows` with two queries and build domain values,
    /// preserving the order of `rows`.
    async fn attach_lines(
        pool: &PgPool,
        rows: Vec<TransactionRow>,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();

        let bookings = sqlx::query_as::<_, SessionBookingRow>(
            "SELECT transaction_id, session_id, session_date
             FROM session_bookings
             WHERE transaction_id = ANY($1)
             ORDER BY session_date, session_id",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let items = sqlx::query_as::<_, AddOnItemRow>(
            "SELECT transaction_id, add_on_id, quantity, unit_price
             FROM add_on_items
             WHERE transaction_id = ANY($1)
             ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut bookings_by_tx: HashMap<DbId, Vec<SessionBooking>> = HashMap::new();
        for b in &bookings {
            bookings_by_tx.entry(b.transaction_id).or_default().push(b.into());
        }
        let mut items_by_tx: HashMap<DbId, Vec<AddOnLineItem>> = HashMap::new();
        for i in &items {
            items_by_tx.entry(i.transaction_id).or_default().push(i.into());
        }

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_domain(
                    bookings_by_tx.remove(&id).unwrap_or_default(),
                    items_by_tx.remove(&id).unwrap_or_default(),
                )
                .map_err(decode_error)
            })
            .collect()
    }
}
