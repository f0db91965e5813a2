//! Conversation persistence keyed by WhatsApp contact.

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;

use crate::llm::Message;
use crate::models::Conversation;

/// Stores one message history per contact. The history column is replaced
/// wholesale by [`upsert`](ConversationStore::upsert); concurrent turns for
/// the same contact are serialized upstream.
#[derive(Clone)]
pub struct ConversationStore {
    pool: SqlitePool,
}

impl ConversationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, contact_id: &str) -> sqlx::Result<Option<Conversation>> {
        sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE contact_id = ?")
            .bind(contact_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Stored history for a contact, empty for contacts never seen before.
    pub async fn history(&self, contact_id: &str) -> sqlx::Result<Vec<Message>> {
        Ok(self
            .get(contact_id)
            .await?
            .map(|c| c.history.0)
            .unwrap_or_default())
    }

    /// Write the full history for a contact in a single statement, creating
    /// the row on first contact. `started_at` survives later writes.
    pub async fn upsert(&self, contact_id: &str, history: &[Message]) -> sqlx::Result<()> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO conversations (contact_id, history, status, started_at, updated_at) \
             VALUES (?, ?, 'active', ?, ?) \
             ON CONFLICT(contact_id) DO UPDATE SET \
                 history = excluded.history, updated_at = excluded.updated_at",
        )
        .bind(contact_id)
        .bind(Json(history))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
