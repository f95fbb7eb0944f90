//! Repository for the read-only `studio_sessions` and `add_ons` catalogs.

use sqlx::PgPool;

use crate::models::catalog::{AddOnRow, SessionRow};

pub struct CatalogRepo;

impl CatalogRepo {
    /// All studio sessions in id order (which is also time-of-day order).
    pub async fn list_sessions(pool: &PgPool) -> Result<Vec<SessionRow>, sqlx::Error> {
        sqlx::query_as::<_, SessionRow>("SELECT id, name, price FROM studio_sessions ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn list_add_ons(pool: &PgPool) -> Result<Vec<AddOnRow>, sqlx::Error> {
        sqlx::query_as::<_, AddOnRow>("SELECT id, name, price FROM add_ons ORDER BY id")
            .fetch_all(pool)
            .await
    }
}
