//! Rows of the `studio_sessions` and `add_ons` catalog tables.

use sqlx::FromRow;
use studio_core::catalog::{AddOn, Session};
use studio_core::types::{DbId, Rupiah};

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: DbId,
    pub name: String,
    pub price: Rupiah,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            name: row.name,
            price: row.price,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AddOnRow {
    pub id: DbId,
    pub name: String,
    pub price: Rupiah,
}

impl From<AddOnRow> for AddOn {
    fn from(row: AddOnRow) -> Self {
        AddOn {
            id: row.id,
            name: row.name,
            price: row.price,
        }
    }
}
