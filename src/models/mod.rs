//! Domain entities persisted in SQLite.
//!
//! Ids are UUIDv4. Statuses are plain strings with a small fixed vocabulary:
//! listings are `available`, conversations `active`, visits `pending`,
//! leads `new`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use uuid::Uuid;

use crate::llm::Message;

/// Property category. Stored and exposed to the model as snake_case strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ListingCategory {
    House,
    Apartment,
    Land,
    Office,
    CommercialUnit,
}

/// Whether a listing is offered for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum OperationKind {
    Sale,
    Rental,
}

/// A property in the catalog. Read-only at runtime; rows are written by the
/// seeder (or an external import).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub category: ListingCategory,
    pub operation: OperationKind,
    pub price: f64,
    pub currency: String,
    pub location: String,
    pub address: String,
    pub rooms: i64,
    pub bathrooms: i64,
    pub total_surface: f64,
    pub covered_surface: f64,
    pub description: String,
    pub features: Json<Vec<String>>,
    pub status: String,
    pub published_at: DateTime<Utc>,
}

/// Per-contact conversation state, keyed by the WhatsApp phone number.
/// `history` holds the full protocol message list and is replaced wholesale
/// once per completed turn.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Conversation {
    pub contact_id: String,
    pub history: Json<Vec<Message>>,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A captured prospect. Duplicates are allowed; only `name` is mandatory.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub preferences: Json<Value>,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

/// Insert payload for [`Lead`].
#[derive(Debug, Clone, Default)]
pub struct NewLead {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub preferences: Option<Value>,
}

/// A visit request for a listing. Scheduling confirmation happens outside
/// this system; rows are created as `pending` and never transition here.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Visit {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub client_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`Visit`].
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub listing_id: Uuid,
    pub client_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
}
