// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.
// Each mock records its calls and supports per-operation failure injection so
// the compensation paths of the provisioning activities can be exercised.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{
    AccountPatch, BaseIdentityProvider, BaseObjectStore, BaseProfileStore, NewAccount, ServerDeps,
};
use crate::domains::staff::models::{NewProfile, Profile, ProfilePatch};

/// Build a profile row for seeding mocks.
pub fn stub_profile(id: &str, role: &str, badge_code: &str) -> Profile {
    Profile {
        id: id.to_string(),
        display_name: format!("Stub {}", id),
        email: format!("{}@example.com", id),
        role: role.to_string(),
        badge_code: badge_code.to_string(),
        location_id: Some("loc-1".to_string()),
        password_length: 8,
        avatar_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// =============================================================================
// Mock Identity Provider
// =============================================================================

pub struct MockIdentityProvider {
    live_accounts: Arc<Mutex<Vec<String>>>,
    create_calls: Arc<Mutex<Vec<NewAccount>>>,
    update_calls: Arc<Mutex<Vec<(String, AccountPatch)>>>,
    delete_calls: Arc<Mutex<Vec<String>>>,
    next_ids: Arc<Mutex<Vec<String>>>,
    fail_create: bool,
    fail_update: bool,
    fail_delete: bool,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            live_accounts: Arc::new(Mutex::new(Vec::new())),
            create_calls: Arc::new(Mutex::new(Vec::new())),
            update_calls: Arc::new(Mutex::new(Vec::new())),
            delete_calls: Arc::new(Mutex::new(Vec::new())),
            next_ids: Arc::new(Mutex::new(Vec::new())),
            fail_create: false,
            fail_update: false,
            fail_delete: false,
        }
    }

    /// Queue a fixed id for the next created account.
    pub fn with_next_id(self, id: &str) -> Self {
        self.next_ids.lock().unwrap().push(id.to_string());
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    /// Whether the account still exists (created and not deleted).
    pub fn account_exists(&self, id: &str) -> bool {
        self.live_accounts.lock().unwrap().iter().any(|a| a == id)
    }

    pub fn create_calls(&self) -> Vec<NewAccount> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<(String, AccountPatch)> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.create_calls.lock().unwrap().len()
            + self.update_calls.lock().unwrap().len()
            + self.delete_calls.lock().unwrap().len()
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseIdentityProvider for MockIdentityProvider {
    async fn create_account(&self, new: NewAccount) -> Result<String> {
        self.create_calls.lock().unwrap().push(new);

        if self.fail_create {
            anyhow::bail!("mock identity provider: create failed");
        }

        let id = {
            let mut queued = self.next_ids.lock().unwrap();
            if queued.is_empty() {
                Uuid::new_v4().to_string()
            } else {
                queued.remove(0)
            }
        };

        self.live_accounts.lock().unwrap().push(id.clone());
        Ok(id)
    }

    async fn update_account(&self, id: &str, patch: AccountPatch) -> Result<()> {
        self.update_calls
            .lock()
            .unwrap()
            .push((id.to_string(), patch));

        if self.fail_update {
            anyhow::bail!("mock identity provider: update failed");
        }
        Ok(())
    }

    async fn delete_account(&self, id: &str) -> Result<()> {
        self.delete_calls.lock().unwrap().push(id.to_string());

        if self.fail_delete {
            anyhow::bail!("mock identity provider: delete failed");
        }

        self.live_accounts.lock().unwrap().retain(|a| a != id);
        Ok(())
    }
}

// =============================================================================
// Mock Profile Store
// =============================================================================

pub struct MockProfileStore {
    profiles: Arc<Mutex<HashMap<String, Profile>>>,
    counters: Arc<Mutex<BTreeMap<String, i64>>>,
    fail_insert: bool,
    fail_update: bool,
    fail_delete: bool,
    fail_badge_lookup: bool,
}

impl MockProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(HashMap::new())),
            counters: Arc::new(Mutex::new(BTreeMap::new())),
            fail_insert: false,
            fail_update: false,
            fail_delete: false,
            fail_badge_lookup: false,
        }
    }

    /// Seed an existing profile row.
    pub fn with_profile(self, profile: Profile) -> Self {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile);
        self
    }

    /// Seed stub profiles carrying the given badge codes.
    pub fn with_badge_codes(self, role: &str, codes: &[&str]) -> Self {
        let mut store = self;
        for (i, code) in codes.iter().enumerate() {
            let id = format!("seed-{}-{}", role, i);
            store = store.with_profile(stub_profile(&id, role, code));
        }
        store
    }

    pub fn failing_insert(mut self) -> Self {
        self.fail_insert = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn failing_badge_lookup(mut self) -> Self {
        self.fail_badge_lookup = true;
        self
    }

    pub fn profile(&self, id: &str) -> Option<Profile> {
        self.profiles.lock().unwrap().get(id).cloned()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.lock().unwrap().len()
    }

    pub fn counter_state(&self) -> BTreeMap<String, i64> {
        self.counters.lock().unwrap().clone()
    }
}

impl Default for MockProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseProfileStore for MockProfileStore {
    async fn insert_profile(&self, new: NewProfile) -> Result<Profile> {
        if self.fail_insert {
            anyhow::bail!("mock profile store: insert failed");
        }

        let profile = Profile {
            id: new.id.clone(),
            display_name: new.display_name,
            email: new.email,
            role: new.role,
            badge_code: new.badge_code,
            location_id: new.location_id,
            password_length: new.password_length,
            avatar_url: new.avatar_url,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        self.profiles
            .lock()
            .unwrap()
            .insert(new.id, profile.clone());
        Ok(profile)
    }

    async fn find_profile(&self, id: &str) -> Result<Option<Profile>> {
        Ok(self.profiles.lock().unwrap().get(id).cloned())
    }

    async fn update_profile(&self, id: &str, patch: ProfilePatch) -> Result<Profile> {
        if self.fail_update {
            anyhow::bail!("mock profile store: update failed");
        }

        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| anyhow::anyhow!("no profile with id {}", id))?;

        if let Some(display_name) = patch.display_name {
            profile.display_name = display_name;
        }
        if let Some(email) = patch.email {
            profile.email = email;
        }
        if let Some(role) = patch.role {
            profile.role = role;
        }
        if let Some(badge_code) = patch.badge_code {
            profile.badge_code = badge_code;
        }
        if let Some(password_length) = patch.password_length {
            profile.password_length = password_length;
        }
        profile.updated_at = Utc::now();

        Ok(profile.clone())
    }

    async fn delete_profile(&self, id: &str) -> Result<u64> {
        if self.fail_delete {
            anyhow::bail!("mock profile store: delete failed");
        }

        let removed = self.profiles.lock().unwrap().remove(id);
        Ok(removed.map(|_| 1).unwrap_or(0))
    }

    async fn badge_codes_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        if self.fail_badge_lookup {
            anyhow::bail!("mock profile store: badge lookup failed");
        }

        let needle = format!("{}-", prefix);
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.badge_code.starts_with(&needle))
            .map(|p| p.badge_code.clone())
            .collect())
    }

    async fn all_badge_codes(&self) -> Result<Vec<String>> {
        if self.fail_badge_lookup {
            anyhow::bail!("mock profile store: badge lookup failed");
        }

        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .map(|p| p.badge_code.clone())
            .collect())
    }

    async fn upsert_counter(&self, prefix: &str, max_suffix: i64) -> Result<()> {
        self.counters
            .lock()
            .unwrap()
            .insert(prefix.to_string(), max_suffix);
        Ok(())
    }

    async fn counters(&self) -> Result<Vec<(String, i64)>> {
        Ok(self
            .counters
            .lock()
            .unwrap()
            .iter()
            .map(|(p, m)| (p.clone(), *m))
            .collect())
    }
}

// =============================================================================
// Mock Object Store
// =============================================================================

pub struct MockObjectStore {
    uploads: Arc<Mutex<Vec<(String, usize)>>>,
    fail_upload: bool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Vec::new())),
            fail_upload: false,
        }
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    /// Get all (key, byte length) pairs that were uploaded
    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn was_uploaded(&self, key: &str) -> bool {
        self.uploads.lock().unwrap().iter().any(|(k, _)| k == key)
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseObjectStore for MockObjectStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((key.to_string(), bytes.len()));

        if self.fail_upload {
            anyhow::bail!("mock object store: upload failed");
        }

        Ok(format!("https://cdn.test/{}", key))
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub identity: Arc<MockIdentityProvider>,
    pub profiles: Arc<MockProfileStore>,
    pub object_store: Arc<MockObjectStore>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            identity: Arc::new(MockIdentityProvider::new()),
            profiles: Arc::new(MockProfileStore::new()),
            object_store: Arc::new(MockObjectStore::new()),
        }
    }

    /// Set a mock identity provider
    pub fn mock_identity(mut self, identity: MockIdentityProvider) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    /// Set a mock profile store
    pub fn mock_profiles(mut self, profiles: MockProfileStore) -> Self {
        self.profiles = Arc::new(profiles);
        self
    }

    /// Set a mock object store
    pub fn mock_object_store(mut self, object_store: MockObjectStore) -> Self {
        self.object_store = Arc::new(object_store);
        self
    }

    /// Convert into ServerDeps for the code under test, keeping the mock
    /// handles on `self` for assertions.
    pub fn to_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.identity.clone(),
            self.profiles.clone(),
            self.object_store.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
