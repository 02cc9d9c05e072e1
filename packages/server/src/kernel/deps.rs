//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! activities, plus the production adapters: GoTrue for accounts, Postgres
//! for profiles.

use anyhow::Result;
use async_trait::async_trait;
use gotrue::models::{CreateUserBody, UpdateUserBody};
use gotrue::GoTrueAdminService;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::staff::models::{BadgeCounter, NewProfile, Profile, ProfilePatch};
use crate::kernel::{
    AccountPatch, BaseIdentityProvider, BaseObjectStore, BaseProfileStore, NewAccount,
};

// =============================================================================
// GoTrueAdminService Adapter (implements BaseIdentityProvider trait)
// =============================================================================

/// Wrapper around GoTrueAdminService that implements BaseIdentityProvider
pub struct GoTrueAdapter(pub Arc<GoTrueAdminService>);

impl GoTrueAdapter {
    pub fn new(service: Arc<GoTrueAdminService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseIdentityProvider for GoTrueAdapter {
    async fn create_account(&self, new: NewAccount) -> Result<String> {
        let body = CreateUserBody {
            email: new.email,
            password: new.password,
            email_confirm: true,
            user_metadata: serde_json::json!({
                "display_name": new.display_name,
                "role": new.role,
            }),
        };

        let user = self
            .0
            .create_user(body)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(user.id)
    }

    async fn update_account(&self, id: &str, patch: AccountPatch) -> Result<()> {
        let body = UpdateUserBody {
            email: patch.email,
            password: patch.password,
            user_metadata: None,
        };

        self.0
            .update_user(id, body)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn delete_account(&self, id: &str) -> Result<()> {
        self.0
            .delete_user(id)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// Postgres profile store (implements BaseProfileStore trait)
// =============================================================================

/// Postgres-backed profile store delegating to the sqlx models.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseProfileStore for PgProfileStore {
    async fn insert_profile(&self, new: NewProfile) -> Result<Profile> {
        Profile::insert(&new, &self.pool).await
    }

    async fn find_profile(&self, id: &str) -> Result<Option<Profile>> {
        Profile::find_by_id(id, &self.pool).await
    }

    async fn update_profile(&self, id: &str, patch: ProfilePatch) -> Result<Profile> {
        Profile::update(id, &patch, &self.pool).await
    }

    async fn delete_profile(&self, id: &str) -> Result<u64> {
        Profile::delete(id, &self.pool).await
    }

    async fn badge_codes_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Profile::badge_codes_with_prefix(prefix, &self.pool).await
    }

    async fn all_badge_codes(&self) -> Result<Vec<String>> {
        Profile::all_badge_codes(&self.pool).await
    }

    async fn upsert_counter(&self, prefix: &str, max_suffix: i64) -> Result<()> {
        BadgeCounter::upsert(prefix, max_suffix, &self.pool).await
    }

    async fn counters(&self) -> Result<Vec<(String, i64)>> {
        let counters = BadgeCounter::find_all(&self.pool).await?;
        Ok(counters
            .into_iter()
            .map(|c| (c.prefix, c.max_suffix))
            .collect())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub identity: Arc<dyn BaseIdentityProvider>,
    pub profiles: Arc<dyn BaseProfileStore>,
    pub object_store: Arc<dyn BaseObjectStore>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        identity: Arc<dyn BaseIdentityProvider>,
        profiles: Arc<dyn BaseProfileStore>,
        object_store: Arc<dyn BaseObjectStore>,
    ) -> Self {
        Self {
            identity,
            profiles,
            object_store,
        }
    }
}
