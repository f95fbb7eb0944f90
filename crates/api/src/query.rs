//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;
use studio_core::calendar::StudioCalendar;
use studio_core::error::CoreError;
use studio_core::pagination::Pagination;

/// Page-based pagination parameters (`?page=&limit=`).
///
/// Missing values fall back to page 1 / limit 10; `limit` is clamped to 1..=100.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn resolve(&self) -> Pagination {
        Pagination::resolve(self.page, self.limit)
    }
}

/// Report filters: optional inclusive studio-day range plus pagination.
#[derive(Debug, Default, Deserialize)]
pub struct ReportParams {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ReportParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::resolve(self.page, self.limit)
    }

    /// Reject a range whose start lies after its end, or whose days have no
    /// UTC bounds on `calendar`.
    pub fn validate_range(&self, calendar: &StudioCalendar) -> Result<(), CoreError> {
        check_day(calendar, "start_date", self.start_date)?;
        check_day(calendar, "end_date", self.end_date)?;
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(CoreError::validation(
                "start_date",
                format!("start_date {start} is after end_date {end}"),
            )),
            _ => Ok(()),
        }
    }
}

fn check_day(
    calendar: &StudioCalendar,
    field: &'static str,
    date: Option<NaiveDate>,
) -> Result<(), CoreError> {
    match date {
        Some(date) if calendar.day_bounds(date).is_err() => Err(CoreError::validation(
            field,
            format!("{field} {date} is outside the supported date range"),
        )),
        _ => Ok(()),
    }
}

/// `?date=YYYY-MM-DD`; defaults to the current studio day.
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityParams {
    pub date: Option<NaiveDate>,
}
