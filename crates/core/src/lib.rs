//! Studio booking domain core.
//!
//! Pure business rules for session bookings, payments and staff attendance.
//! Persistence is reached only through the traits in [`store`], so the same
//! logic runs against PostgreSQL (`studio-db`) and the [`memory`] store used
//! in tests.

pub mod attendance;
pub mod booking;
pub mod calendar;
pub mod catalog;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod pagination;
pub mod roles;
pub mod service;
pub mod store;
pub mod transaction;
pub mod types;
