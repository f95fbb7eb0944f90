//! Rows of the `attendance` table.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use studio_core::attendance::AttendanceRecord;
use studio_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct AttendanceRow {
    pub id: DbId,
    pub user_id: DbId,
    pub work_date: NaiveDate,
    pub clock_in: Timestamp,
    pub clock_out: Option<Timestamp>,
    pub status: String,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            id: row.id,
            user_id: row.user_id,
            work_date: row.work_date,
            clock_in: row.clock_in,
            clock_out: row.clock_out,
            status: row.status,
        }
    }
}

/// Attendance row joined with the owning user's name, for reports.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceWithUser {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub work_date: NaiveDate,
    pub clock_in: Timestamp,
    pub clock_out: Option<Timestamp>,
    pub status: String,
}
