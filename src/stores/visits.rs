//! Visit scheduling requests.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{NewVisit, Visit};

#[derive(Clone)]
pub struct VisitStore {
    pool: SqlitePool,
}

impl VisitStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a visit request with status `pending` and return its id.
    /// The listing id is not checked against the catalog.
    pub async fn insert(&self, visit: NewVisit) -> sqlx::Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO visits \
                 (id, listing_id, client_name, phone, email, preferred_date, preferred_time, \
                  status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, 'pending', ?)",
        )
        .bind(id)
        .bind(visit.listing_id)
        .bind(&visit.client_name)
        .bind(&visit.phone)
        .bind(&visit.email)
        .bind(&visit.preferred_date)
        .bind(&visit.preferred_time)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn get(&self, id: Uuid) -> sqlx::Result<Option<Visit>> {
        sqlx::query_as::<_, Visit>("SELECT * FROM visits WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}
