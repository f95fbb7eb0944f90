//! Row structs and DTOs.
//!
//! Row structs mirror the tables one-to-one and convert into the
//! `studio-core` domain types; status columns are stored as their wire
//! labels and parsed on the way out.

pub mod attendance;
pub mod catalog;
pub mod report;
pub mod transaction;
pub mod user;

/// Wrap a domain decode failure so it travels as a `sqlx::Error`.
pub(crate) fn decode_error(err: studio_core::error::CoreError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}
