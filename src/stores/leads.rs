//! Lead capture.

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::{Lead, NewLead};

#[derive(Clone)]
pub struct LeadStore {
    pool: SqlitePool,
}

impl LeadStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a lead with status `new` and return its id. Repeated captures
    /// of the same person create separate rows.
    pub async fn insert(&self, lead: NewLead) -> sqlx::Result<Uuid> {
        let id = Uuid::new_v4();
        let preferences = lead.preferences.unwrap_or_else(|| serde_json::json!({}));
        sqlx::query(
            "INSERT INTO leads (id, name, phone, email, preferences, status, registered_at) \
             VALUES (?, ?, ?, ?, ?, 'new', ?)",
        )
        .bind(id)
        .bind(&lead.name)
        .bind(&lead.phone)
        .bind(&lead.email)
        .bind(Json(preferences))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn get(&self, id: Uuid) -> sqlx::Result<Option<Lead>> {
        sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use serde_json::json;

    async fn store() -> LeadStore {
        let db = Database::connect_in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        LeadStore::new(db.pool().clone())
    }

    #[tokio::test]
    async fn inserts_with_defaults() {
        let store = store().await;
        let id = store
            .insert(NewLead {
                name: "Carlos Gómez".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let lead = store.get(id).await.unwrap().unwrap();
        assert_eq!(lead.name, "Carlos Gómez");
        assert_eq!(lead.status, "new");
        assert_eq!(lead.preferences.0, json!({}));
        assert!(lead.phone.is_none());
        assert!(lead.email.is_none());
    }

    #[tokio::test]
    async fn preferences_round_trip() {
        let store = store().await;
        let prefs = json!({"zone": "Pichincha", "budget_max": 500, "operation": "rental"});
        let id = store
            .insert(NewLead {
                name: "Ana".into(),
                phone: Some("5493415550003".into()),
                email: Some("ana@example.com".into()),
                preferences: Some(prefs.clone()),
            })
            .await
            .unwrap();

        let lead = store.get(id).await.unwrap().unwrap();
        assert_eq!(lead.preferences.0, prefs);
        assert_eq!(lead.phone.as_deref(), Some("5493415550003"));
    }

    #[tokio::test]
    async fn duplicate_captures_get_separate_rows() {
        let store = store().await;
        let lead = NewLead {
            name: "Carlos Gómez".into(),
            ..Default::default()
        };
        let a = store.insert(lead.clone()).await.unwrap();
        let b = store.insert(lead).await.unwrap();

        assert_ne!(a, b);
        assert!(store.get(a).await.unwrap().is_some());
        assert!(store.get(b).await.unwrap().is_some());
    }
}
