//! Studio-local calendar.
//!
//! Bookings, attendance and reports all reason in whole calendar days as
//! seen at the studio, while timestamps are stored in UTC. [`StudioCalendar`]
//! converts between the two using a fixed UTC offset (WIB by default).

use chrono::{Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Offset, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default studio offset: Western Indonesia Time (UTC+7).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 7;

/// Maps UTC timestamps onto studio calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudioCalendar {
    offset: FixedOffset,
}

impl StudioCalendar {
    /// Build a calendar for a whole-hour offset east of UTC.
    pub fn from_utc_offset_hours(hours: i32) -> Result<Self, CoreError> {
        FixedOffset::east_opt(hours * 3600)
            .map(|offset| Self { offset })
            .ok_or_else(|| {
                CoreError::validation(
                    "utc_offset_hours",
                    format!("{hours} is not a valid UTC offset"),
                )
            })
    }

    /// The studio calendar day containing `ts`.
    pub fn local_date(&self, ts: Timestamp) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// The current studio calendar day.
    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }

    /// UTC instant at which the studio day `date` starts.
    ///
    /// Fails for days at the edge of the representable range whose start
    /// falls outside it.
    pub fn start_of_day(&self, date: NaiveDate) -> Result<Timestamp, CoreError> {
        date.and_time(NaiveTime::MIN)
            .and_utc()
            .checked_sub_signed(Duration::seconds(i64::from(self.offset.local_minus_utc())))
            .ok_or_else(|| out_of_range(date))
    }

    /// Half-open UTC range `[start, end)` covering `first..=last` studio days.
    pub fn range_bounds(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<(Timestamp, Timestamp), CoreError> {
        let start = self.start_of_day(first)?;
        let end = self
            .start_of_day(last)?
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| out_of_range(last))?;
        Ok((start, end))
    }

    /// Half-open UTC range covering the single studio day `date`.
    pub fn day_bounds(&self, date: NaiveDate) -> Result<(Timestamp, Timestamp), CoreError> {
        self.range_bounds(date, date)
    }

    /// Half-open UTC range covering the calendar month containing `date`.
    pub fn month_bounds(&self, date: NaiveDate) -> Result<(Timestamp, Timestamp), CoreError> {
        let first = date - Duration::days(i64::from(date.day0()));
        let start = self.start_of_day(first)?;
        let end = match first.checked_add_months(Months::new(1)) {
            Some(next) => self.start_of_day(next)?,
            None => self.range_bounds(first, NaiveDate::MAX)?.1,
        };
        Ok((start, end))
    }
}

fn out_of_range(date: NaiveDate) -> CoreError {
    CoreError::validation("date", format!("{date} is outside the supported date range"))
}

impl Default for StudioCalendar {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}
