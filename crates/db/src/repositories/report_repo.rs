//! Read-only reporting queries behind the transaction/attendance listings and
//! the dashboard.
//!
//! Date filters arrive as studio calendar days and are turned into UTC bounds
//! through the caller's [`StudioCalendar`]. Days whose bounds fall outside
//! the representable range clamp to its ends.

use chrono::NaiveDate;
use sqlx::PgPool;
use studio_core::calendar::StudioCalendar;
use studio_core::pagination::Pagination;
use studio_core::types::Timestamp;

use crate::models::report::{AttendancePage, DashboardSummary, TransactionPage};
use crate::repositories::{AttendanceRepo, TransactionRepo, UserRepo};

/// Number of transactions shown in the dashboard's "recent" panel.
pub const RECENT_TRANSACTIONS: i64 = 5;

pub struct ReportRepo;

impl ReportRepo {
    pub async fn transactions(
        pool: &PgPool,
        calendar: &StudioCalendar,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        pagination: Pagination,
    ) -> Result<TransactionPage, sqlx::Error> {
        let (start, end) = bounds(calendar, start_date, end_date);

        let (total, total_revenue) = TransactionRepo::totals(pool, start, end).await?;
        let items =
            TransactionRepo::list(pool, start, end, pagination.limit, pagination.offset()).await?;

        Ok(TransactionPage {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: pagination.total_pages(total),
            total_revenue,
        })
    }

    /// Attendance listing. With any date bound the whole range is returned
    /// and `pagination` is ignored.
    pub async fn attendance(
        pool: &PgPool,
        calendar: &StudioCalendar,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        pagination: Pagination,
    ) -> Result<AttendancePage, sqlx::Error> {
        let (start, end) = bounds(calendar, start_date, end_date);
        let total = AttendanceRepo::count(pool, start, end).await?;

        if start_date.is_some() || end_date.is_some() {
            let items = AttendanceRepo::list_with_users(pool, start, end, None, 0).await?;
            return Ok(AttendancePage {
                items,
                total,
                page: None,
                limit: None,
                total_pages: if total > 0 { 1 } else { 0 },
            });
        }

        let items = AttendanceRepo::list_with_users(
            pool,
            None,
            None,
            Some(pagination.limit),
            pagination.offset(),
        )
        .await?;
        Ok(AttendancePage {
            items,
            total,
            page: Some(pagination.page),
            limit: Some(pagination.limit),
            total_pages: pagination.total_pages(total),
        })
    }

    /// Dashboard figures relative to `today` on the studio calendar.
    pub async fn dashboard(
        pool: &PgPool,
        calendar: &StudioCalendar,
        today: NaiveDate,
    ) -> Result<DashboardSummary, sqlx::Error> {
        let (month_start, month_end) = calendar
            .month_bounds(today)
            .unwrap_or((Timestamp::MIN_UTC, Timestamp::MAX_UTC));
        let (month_transactions, month_revenue) =
            TransactionRepo::totals(pool, Some(month_start), Some(month_end)).await?;
        let total_users = UserRepo::count(pool).await?;
        let sessions_booked_today = TransactionRepo::count_bookings_on(pool, today).await?;
        let recent_transactions =
            TransactionRepo::list(pool, None, None, RECENT_TRANSACTIONS, 0).await?;

        Ok(DashboardSummary {
            month_revenue,
            month_transactions,
            total_users,
            sessions_booked_today,
            recent_transactions,
        })
    }
}

/// Convert optional inclusive calendar days into an optional `[start, end)`.
fn bounds(
    calendar: &StudioCalendar,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> (Option<Timestamp>, Option<Timestamp>) {
    let start = start_date.map(|d| calendar.start_of_day(d).unwrap_or(Timestamp::MIN_UTC));
    let end = end_date.map(|d| {
        d.succ_opt()
            .and_then(|next| calendar.start_of_day(next).ok())
            .unwrap_or(Timestamp::MAX_UTC)
    });
    (start, end)
}
