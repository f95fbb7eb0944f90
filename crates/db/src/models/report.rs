//! Aggregates returned by the reporting queries.

use serde::Serialize;
use studio_core::transaction::Transaction;
use studio_core::types::Rupiah;

use super::attendance::AttendanceWithUser;

/// One page of the transaction report.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    /// Sum of `total_price` over the whole filtered range, not just this page.
    pub total_revenue: Rupiah,
}

/// Attendance listing. `page`/`limit` are `None` when a date range was given
/// and the whole range is returned.
#[derive(Debug, Clone, Serialize)]
pub struct AttendancePage {
    pub items: Vec<AttendanceWithUser>,
    pub total: i64,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub month_revenue: Rupiah,
    pub month_transactions: i64,
    pub total_users: i64,
    pub sessions_booked_today: i64,
    pub recent_transactions: Vec<Transaction>,
}
