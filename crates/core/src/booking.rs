//! Booking conflict checker.
//!
//! A slot is one studio session on one calendar day. A slot is taken iff some
//! persisted transaction already holds the exact `(session_id, date)` pair.
//! The checks here are advisory; the store guarantees uniqueness when the
//! transaction is inserted.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::StudioCalendar;
use crate::catalog::Session;
use crate::types::DbId;

/// One studio session on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SlotKey {
    pub session_id: DbId,
    pub date: NaiveDate,
}

/// A booking date as submitted by a client.
///
/// Accepts a plain `YYYY-MM-DD` or an RFC 3339 timestamp; the time-of-day
/// of a timestamp is discarded once it is mapped onto the studio calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotDate {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl SlotDate {
    pub fn to_date(self, calendar: &StudioCalendar) -> NaiveDate {
        match self {
            SlotDate::Date(date) => date,
            SlotDate::DateTime(ts) => calendar.local_date(ts.with_timezone(&Utc)),
        }
    }
}

impl From<NaiveDate> for SlotDate {
    fn from(date: NaiveDate) -> Self {
        SlotDate::Date(date)
    }
}

/// Set of slots known to be taken.
#[derive(Debug, Clone, Default)]
pub struct BookedSlots {
    slots: HashSet<SlotKey>,
}

impl BookedSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every session booked on `date`.
    pub fn extend_day(&mut self, date: NaiveDate, session_ids: impl IntoIterator<Item = DbId>) {
        self.slots.extend(
            session_ids
                .into_iter()
                .map(|session_id| SlotKey { session_id, date }),
        );
    }

    pub fn is_available(&self, session_id: DbId, date: NaiveDate) -> bool {
        !self.slots.contains(&SlotKey { session_id, date })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Availability of every catalog session given the ids booked on one day.
pub fn availability(sessions: &[Session], booked: &HashSet<DbId>) -> BTreeMap<DbId, bool> {
    sessions
        .iter()
        .map(|s| (s.id, !booked.contains(&s.id)))
        .collect()
}
