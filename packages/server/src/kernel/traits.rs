// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (the provisioning activities) lives in domain functions
// that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseIdentityProvider)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::staff::models::{NewProfile, Profile, ProfilePatch};

// =============================================================================
// Identity Provider Trait (Infrastructure - account store)
// =============================================================================

/// Request to create a credential-bearing account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: String,
}

/// Partial account update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

#[async_trait]
pub trait BaseIdentityProvider: Send + Sync {
    /// Create an account, auto-confirmed. Returns the provider-assigned id.
    async fn create_account(&self, new: NewAccount) -> Result<String>;

    /// Update account credentials/email.
    async fn update_account(&self, id: &str, patch: AccountPatch) -> Result<()>;

    /// Delete the account.
    async fn delete_account(&self, id: &str) -> Result<()>;
}

// =============================================================================
// Object Store Trait (Infrastructure - avatar artifacts)
// =============================================================================

#[async_trait]
pub trait BaseObjectStore: Send + Sync {
    /// Upload an object under `key`, returning its public URL.
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<String>;
}

// =============================================================================
// Profile Store Trait (Infrastructure - relational business records)
// =============================================================================

#[async_trait]
pub trait BaseProfileStore: Send + Sync {
    async fn insert_profile(&self, new: NewProfile) -> Result<Profile>;

    async fn find_profile(&self, id: &str) -> Result<Option<Profile>>;

    async fn update_profile(&self, id: &str, patch: ProfilePatch) -> Result<Profile>;

    /// Returns the number of rows removed (0 when the row was already gone).
    async fn delete_profile(&self, id: &str) -> Result<u64>;

    /// Badge codes currently issued under `prefix-` (allocator snapshot).
    async fn badge_codes_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Every badge code in the system (reconciler ground truth).
    async fn all_badge_codes(&self) -> Result<Vec<String>>;

    /// Persist a recomputed counter baseline for one prefix.
    async fn upsert_counter(&self, prefix: &str, max_suffix: i64) -> Result<()>;

    /// Current counter baselines as (prefix, max_suffix) pairs.
    async fn counters(&self) -> Result<Vec<(String, i64)>>;
}
