//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod attendance_repo;
pub mod catalog_repo;
pub mod report_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use attendance_repo::AttendanceRepo;
pub use catalog_repo::CatalogRepo;
pub use report_repo::ReportRepo;
pub use transaction_repo::TransactionRepo;
pub use user_repo::UserRepo;
