//! Repository for the `attendance` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use studio_core::attendance::STATUS_PRESENT;
use studio_core::types::{DbId, Timestamp};

use crate::models::attendance::{AttendanceRow, AttendanceWithUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, work_date, clock_in, clock_out, status";

/// Optional half-open `[start, end)` filter on `clock_in`.
const RANGE_FILTER: &str = "($1::timestamptz IS NULL OR a.clock_in >= $1) \
                            AND ($2::timestamptz IS NULL OR a.clock_in < $2)";

pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Open a record for `work_date`.
    ///
    /// Fails with a unique violation on `uq_attendance_user_day` or
    /// `uq_attendance_open_per_user` when the user already has one.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        work_date: NaiveDate,
        clock_in: Timestamp,
    ) -> Result<AttendanceRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance (user_id, work_date, clock_in, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(user_id)
            .bind(work_date)
            .bind(clock_in)
            .bind(STATUS_PRESENT)
            .fetch_one(pool)
            .await
    }

    /// Most recent open record of the user, on any day.
    pub async fn find_open(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<AttendanceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance
             WHERE user_id = $1 AND clock_out IS NULL
             ORDER BY clock_in DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_for_day(
        pool: &PgPool,
        user_id: DbId,
        work_date: NaiveDate,
    ) -> Result<Option<AttendanceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attendance WHERE user_id = $1 AND work_date = $2");
        sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(user_id)
            .bind(work_date)
            .fetch_optional(pool)
            .await
    }

    /// Set `clock_out` on a still-open record.
    ///
    /// Returns `None` if the record does not exist or is already closed.
    pub async fn close(
        pool: &PgPool,
        id: DbId,
        clock_out: Timestamp,
    ) -> Result<Option<AttendanceRow>, sqlx::Error> {
        let query = format!(
            "UPDATE attendance SET clock_out = $2
             WHERE id = $1 AND clock_out IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(id)
            .bind(clock_out)
            .fetch_optional(pool)
            .await
    }

    /// Newest-first attendance within `[start, end)`, joined with usernames.
    ///
    /// `limit = None` returns every matching row.
    pub async fn list_with_users(
        pool: &PgPool,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<AttendanceWithUser>, sqlx::Error> {
        let query = format!(
            "SELECT a.id, a.user_id, u.username, a.work_date, a.clock_in, a.clock_out, a.status
             FROM attendance a
             JOIN users u ON u.id = a.user_id
             WHERE {RANGE_FILTER}
             ORDER BY a.clock_in DESC, a.id DESC
             LIMIT $3 OFFSET $4"
        );
        // `LIMIT NULL` means no limit in PostgreSQL.
        sqlx::query_as::<_, AttendanceWithUser>(&query)
            .bind(start)
            .bind(end)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(
        pool: &PgPool,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM attendance a WHERE {RANGE_FILTER}");
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(start)
            .bind(end)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
