//! Session and add-on catalogs.
//!
//! Both catalogs are read-only reference data. Handlers fetch them through
//! [`CatalogStore`](crate::store::CatalogStore) and the transaction builder
//! prices requests against a [`CatalogSnapshot`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Rupiah};

/// A bookable studio time-slot, e.g. "Sesi 1 (11.00 - 13.00)".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: DbId,
    pub name: String,
    pub price: Rupiah,
}

/// An optional item sold alongside a booking (strings, sticks, drinks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: DbId,
    pub name: String,
    pub price: Rupiah,
}

/// Point-in-time view of both catalogs, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    sessions: HashMap<DbId, Session>,
    add_ons: HashMap<DbId, AddOn>,
}

impl CatalogSnapshot {
    pub fn new(sessions: Vec<Session>, add_ons: Vec<AddOn>) -> Self {
        Self {
            sessions: sessions.into_iter().map(|s| (s.id, s)).collect(),
            add_ons: add_ons.into_iter().map(|a| (a.id, a)).collect(),
        }
    }

    pub fn session(&self, id: DbId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn add_on(&self, id: DbId) -> Option<&AddOn> {
        self.add_ons.get(&id)
    }
}
