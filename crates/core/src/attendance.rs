//! Staff attendance (clock-in / clock-out).
//!
//! One attendance cycle per user per studio day, and never more than one
//! open record per user. Clock-out closes the most recent open record even
//! if it was opened on an earlier day.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::calendar::StudioCalendar;
use crate::error::CoreError;
use crate::store::AttendanceStore;
use crate::types::{DbId, Timestamp};

/// Status recorded on every clock-in.
pub const STATUS_PRESENT: &str = "Hadir";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub id: DbId,
    pub user_id: DbId,
    /// Studio calendar day of `clock_in`.
    pub work_date: NaiveDate,
    pub clock_in: Timestamp,
    pub clock_out: Option<Timestamp>,
    pub status: String,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}

/// Decide whether a user may clock in, given today's record and any open one.
pub fn check_clock_in(
    todays: Option<&AttendanceRecord>,
    open: Option<&AttendanceRecord>,
) -> Result<(), CoreError> {
    match todays {
        Some(record) if record.is_open() => Err(CoreError::AlreadyClockedIn),
        Some(_) => Err(CoreError::AlreadyCompleted),
        None if open.is_some() => Err(CoreError::AlreadyClockedIn),
        None => Ok(()),
    }
}

pub struct AttendanceService<'a, S: AttendanceStore> {
    store: &'a S,
    calendar: StudioCalendar,
}

impl<'a, S: AttendanceStore> AttendanceService<'a, S> {
    pub fn new(store: &'a S, calendar: StudioCalendar) -> Self {
        Self { store, calendar }
    }

    pub async fn clock_in(&self, user_id: DbId) -> Result<AttendanceRecord, CoreError> {
        self.clock_in_at(user_id, Utc::now()).await
    }

    pub async fn clock_in_at(
        &self,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<AttendanceRecord, CoreError> {
        let today = self.calendar.local_date(now);
        let todays = self.store.find_attendance_for_day(user_id, today).await?;
        let open = match todays {
            Some(_) => None,
            None => self.store.find_open_attendance(user_id).await?,
        };
        check_clock_in(todays.as_ref(), open.as_ref())?;

        let record = self.store.create_attendance(user_id, today, now).await?;
        tracing::info!(user_id, record_id = record.id, %today, "Clocked in");
        Ok(record)
    }

    pub async fn clock_out(&self, user_id: DbId) -> Result<AttendanceRecord, CoreError> {
        self.clock_out_at(user_id, Utc::now()).await
    }

    pub async fn clock_out_at(
        &self,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<AttendanceRecord, CoreError> {
        let open = self
            .store
            .find_open_attendance(user_id)
            .await?
            .ok_or(CoreError::NoOpenRecord)?;

        let record = self
            .store
            .close_attendance(open.id, now)
            .await?
            .ok_or(CoreError::NoOpenRecord)?;
        tracing::info!(user_id, record_id = record.id, "Clocked out");
        Ok(record)
    }
}
