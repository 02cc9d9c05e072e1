use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Staff profile - SQL persistence layer
///
/// `id` equals the identity-provider account id; the pairing invariant
/// (profile exists iff account exists) is enforced by the provisioning
/// activities, not by the database.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, serde::Serialize)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    pub email: String,
    /// Stored as raw text so rows written under retired role names still load.
    pub role: String,
    pub badge_code: String,
    pub location_id: Option<String>,
    /// Derived metadata only; the credential itself never lands here.
    pub password_length: i32,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new profile row.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub badge_code: String,
    pub location_id: Option<String>,
    pub password_length: i32,
    pub avatar_url: Option<String>,
}

/// Partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub badge_code: Option<String>,
    pub password_length: Option<i32>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.email.is_none()
            && self.role.is_none()
            && self.badge_code.is_none()
            && self.password_length.is_none()
    }
}

impl Profile {
    /// Find profile by id
    pub async fn find_by_id(id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert new profile
    pub async fn insert(new: &NewProfile, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO profiles (
                id,
                display_name,
                email,
                role,
                badge_code,
                location_id,
                password_length,
                avatar_url
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(&new.id)
        .bind(&new.display_name)
        .bind(&new.email)
        .bind(&new.role)
        .bind(&new.badge_code)
        .bind(&new.location_id)
        .bind(new.password_length)
        .bind(&new.avatar_url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Apply a partial patch, returning the updated row.
    pub async fn update(id: &str, patch: &ProfilePatch, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE profiles SET
                display_name = COALESCE($2, display_name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                badge_code = COALESCE($5, badge_code),
                password_length = COALESCE($6, password_length),
                updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&patch.display_name)
        .bind(&patch.email)
        .bind(&patch.role)
        .bind(&patch.badge_code)
        .bind(patch.password_length)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete a profile row. Returns the number of rows removed.
    pub async fn delete(id: &str, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Badge codes currently issued under `prefix-` (allocator snapshot).
    pub async fn badge_codes_with_prefix(prefix: &str, pool: &PgPool) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT badge_code FROM profiles WHERE badge_code LIKE $1 || '-%'")
                .bind(prefix)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(code,)| code).collect())
    }

    /// Every badge code in the system (reconciler ground truth).
    pub async fn all_badge_codes(pool: &PgPool) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT badge_code FROM profiles")
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(|(code,)| code).collect())
    }
}

/// Derived per-prefix counter baseline, rebuilt from profile badge codes.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct BadgeCounter {
    pub prefix: String,
    pub max_suffix: i64,
    pub updated_at: DateTime<Utc>,
}

impl BadgeCounter {
    pub async fn upsert(prefix: &str, max_suffix: i64, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO badge_counters (prefix, max_suffix, updated_at)
             VALUES ($1, $2, now())
             ON CONFLICT (prefix)
             DO UPDATE SET max_suffix = EXCLUDED.max_suffix, updated_at = now()",
        )
        .bind(prefix)
        .bind(max_suffix)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM badge_counters ORDER BY prefix")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
