//! Integration tests for the reporting queries.

mod common;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use sqlx::PgPool;
use studio_core::calendar::StudioCalendar;
use studio_core::ledger::PaymentState;
use studio_core::pagination::Pagination;
use studio_core::store::BookingStore;
use studio_core::transaction::{PaymentMethod, SessionBooking, StudioStatus, TransactionDraft};
use studio_core::types::{DbId, Rupiah};
use studio_db::repositories::{AttendanceRepo, ReportRepo};
use studio_db::PgStore;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

async fn book(store: &PgStore, user_id: DbId, session_id: DbId, d: u32, total: Rupiah) -> DbId {
    let draft = TransactionDraft {
        user_id,
        customer_name: format!("Customer {session_id}-{d}"),
        phone: None,
        notes: None,
        total_price: total,
        payment: PaymentState::compute(total, total),
        payment_method: PaymentMethod::Cash,
        studio_status: StudioStatus::Booked,
        session_bookings: vec![SessionBooking {
            session_id,
            date: day(d),
        }],
        add_on_items: vec![],
    };
    store.create_transaction(&draft).await.unwrap().id
}

/// Move a transaction's `created_at` so date filters can be exercised.
async fn backdate(pool: &PgPool, id: DbId, days: i64) {
    sqlx::query("UPDATE transactions SET created_at = NOW() - make_interval(days => $2::int) WHERE id = $1")
        .bind(id)
        .bind(days as i32)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transaction_page_totals_cover_whole_range(pool: PgPool) {
    let staff = common::create_user(&pool, "kasir1", "user").await;
    let store = PgStore::new(pool.clone());
    for session_id in 1..=3 {
        book(&store, staff.id, session_id, 18, 85_000).await;
    }

    let page = ReportRepo::transactions(
        &pool,
        &StudioCalendar::default(),
        None,
        None,
        Pagination::resolve(Some(1), Some(2)),
    )
    .await
    .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.total_revenue, 255_000);
    assert_eq!(page.items[0].session_bookings.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transaction_date_filter(pool: PgPool) {
    let staff = common::create_user(&pool, "kasir1", "user").await;
    let store = PgStore::new(pool.clone());
    let calendar = StudioCalendar::default();

    let old = book(&store, staff.id, 1, 18, 85_000).await;
    book(&store, staff.id, 2, 18, 100_000).await;
    backdate(&pool, old, 10).await;

    let today = calendar.today();
    let page = ReportRepo::transactions(
        &pool,
        &calendar,
        Some(today - Duration::days(1)),
        Some(today),
        Pagination::default(),
    )
    .await
    .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.total_revenue, 100_000);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_listing_modes(pool: PgPool) {
    let a = common::create_user(&pool, "alya", "user").await;
    let b = common::create_user(&pool, "bima", "admin").await;
    let calendar = StudioCalendar::default();
    let now = Utc::now();

    AttendanceRepo::create(&pool, a.id, calendar.local_date(now), now)
        .await
        .unwrap();
    AttendanceRepo::create(&pool, b.id, calendar.local_date(now), now)
        .await
        .unwrap();

    let paged = ReportRepo::attendance(
        &pool,
        &calendar,
        None,
        None,
        Pagination::resolve(None, Some(1)),
    )
    .await
    .unwrap();
    assert_eq!(paged.items.len(), 1);
    assert_eq!(paged.total, 2);
    assert_eq!(paged.total_pages, 2);
    assert_eq!(paged.limit, Some(1));

    let today = calendar.today();
    let ranged = ReportRepo::attendance(
        &pool,
        &calendar,
        Some(today),
        Some(today),
        Pagination::resolve(None, Some(1)),
    )
    .await
    .unwrap();
    assert_eq!(ranged.items.len(), 2, "a date range returns the whole range");
    assert_eq!(ranged.page, None);
    let names: Vec<_> = ranged.items.iter().map(|r| r.username.as_str()).collect();
    assert!(names.contains(&"alya") && names.contains(&"bima"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_summary(pool: PgPool) {
    let staff = common::create_user(&pool, "kasir1", "user").await;
    common::create_user(&pool, "owner", "admin").await;
    let store = PgStore::new(pool.clone());
    let calendar = StudioCalendar::default();
    let today = calendar.today();

    for session_id in 1..=6 {
        book(&store, staff.id, session_id, 1, 85_000).await;
    }
    // Booked for "today" on the studio calendar.
    let draft = TransactionDraft {
        user_id: staff.id,
        customer_name: "Today".into(),
        phone: None,
        notes: None,
        total_price: 85_000,
        payment: PaymentState::compute(85_000, 85_000),
        payment_method: PaymentMethod::Qris,
        studio_status: StudioStatus::Booked,
        session_bookings: vec![SessionBooking {
            session_id: 7,
            date: today,
        }],
        add_on_items: vec![],
    };
    store.create_transaction(&draft).await.unwrap();

    let summary = ReportRepo::dashboard(&pool, &calendar, today).await.unwrap();
    assert_eq!(summary.total_users, 2);
    assert_eq!(summary.month_transactions, 7);
    assert_eq!(summary.month_revenue, 7 * 85_000);
    assert!(summary.sessions_booked_today >= 1);
    assert_eq!(summary.recent_transactions.len(), 5);
    assert_eq!(summary.recent_transactions[0].customer_name, "Today");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_utc_bounds_follow_studio_calendar(pool: PgPool) {
    let staff = common::create_user(&pool, "kasir1", "user").await;
    let store = PgStore::new(pool.clone());
    let calendar = StudioCalendar::default();

    let id = book(&store, staff.id, 1, 18, 85_000).await;
    // 2026-10-17 18:00 UTC is 2026-10-18 01:00 at UTC+7.
    let ts = Utc.with_ymd_and_hms(2026, 10, 17, 18, 0, 0).unwrap();
    sqlx::query("UPDATE transactions SET created_at = $2 WHERE id = $1")
        .bind(id)
        .bind(ts)
        .execute(&pool)
        .await
        .unwrap();

    let on_18th = ReportRepo::transactions(&pool, &calendar, Some(day(18)), Some(day(18)), Pagination::default())
        .await
        .unwrap();
    assert_eq!(on_18th.total, 1);

    let on_17th = ReportRepo::transactions(&pool, &calendar, Some(day(17)), Some(day(17)), Pagination::default())
        .await
        .unwrap();
    assert_eq!(on_17th.total, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_extreme_dates_clamp_to_full_range(pool: PgPool) {
    let staff = common::create_user(&pool, "kasir1", "user").await;
    let store = PgStore::new(pool.clone());
    book(&store, staff.id, 1, 18, 85_000).await;

    let page = ReportRepo::transactions(
        &pool,
        &StudioCalendar::default(),
        Some(NaiveDate::MIN),
        Some(NaiveDate::MAX),
        Pagination::default(),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 1);

    let west = StudioCalendar::from_utc_offset_hours(-5).unwrap();
    let attendance = ReportRepo::attendance(
        &pool,
        &west,
        Some(NaiveDate::MIN),
        Some(NaiveDate::MAX),
        Pagination::default(),
    )
    .await
    .unwrap();
    assert_eq!(attendance.total, 0);
}
