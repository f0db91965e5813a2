//! Catalog queries backing the search and detail tools.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::models::{Listing, ListingCategory, OperationKind};

/// Upper bound on rows returned by a single search.
pub const MAX_SEARCH_RESULTS: i64 = 10;

/// Search criteria. `None` fields leave the corresponding column
/// unconstrained; set fields combine conjunctively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub category: Option<ListingCategory>,
    pub operation: Option<OperationKind>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub location: Option<String>,
    pub rooms: Option<i64>,
    pub bathrooms: Option<i64>,
}

/// Read access to the property catalog.
#[derive(Clone)]
pub struct ListingStore {
    pool: SqlitePool,
}

impl ListingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch listings matching the filter, capped at [`MAX_SEARCH_RESULTS`].
    ///
    /// Category, operation, rooms and bathrooms match exactly; price bounds
    /// are inclusive; location matches any substring, ignoring case, accents
    /// included.
    pub async fn search(&self, filter: &ListingFilter) -> sqlx::Result<Vec<Listing>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM listings WHERE 1 = 1");

        if let Some(category) = filter.category {
            query.push(" AND category = ").push_bind(category);
        }
        if let Some(operation) = filter.operation {
            query.push(" AND operation = ").push_bind(operation);
        }
        if let Some(price_min) = filter.price_min {
            query.push(" AND price >= ").push_bind(price_min);
        }
        if let Some(price_max) = filter.price_max {
            query.push(" AND price <= ").push_bind(price_max);
        }
        if let Some(rooms) = filter.rooms {
            query.push(" AND rooms = ").push_bind(rooms);
        }
        if let Some(bathrooms) = filter.bathrooms {
            query.push(" AND bathrooms = ").push_bind(bathrooms);
        }
        if filter.location.is_none() {
            query.push(" LIMIT ").push_bind(MAX_SEARCH_RESULTS);
        }

        let mut listings = query
            .build_query_as::<Listing>()
            .fetch_all(&self.pool)
            .await?;

        // SQLite's LIKE folds only ASCII case, so the location match runs
        // here; the cap applies to the matched rows.
        if let Some(location) = &filter.location {
            let needle = location.to_lowercase();
            listings.retain(|l| l.location.to_lowercase().contains(&needle));
            listings.truncate(MAX_SEARCH_RESULTS as usize);
        }

        Ok(listings)
    }

    pub async fn get(&self, id: Uuid) -> sqlx::Result<Option<Listing>> {
        sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}
