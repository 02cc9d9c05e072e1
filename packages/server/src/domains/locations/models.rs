use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Gym location - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone, serde::Serialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    /// Profile id of the owner; None means the location is unclaimed.
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Location {
    /// Find location by id
    pub async fn find_by_id(id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find all locations
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM locations ORDER BY name")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Whether this location already has an owner assigned.
    pub fn is_claimed(&self) -> bool {
        self.owner_id.is_some()
    }
}
