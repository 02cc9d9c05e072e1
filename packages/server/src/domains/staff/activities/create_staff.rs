//! Create staff action - provisions an account/profile pair across the
//! identity provider and the profiles table, with compensation.
//!
//! Order matters: the account is created first because it is the step we know
//! how to undo. If anything after it fails, the account is deleted best-effort
//! and the caller sees the original cause. An avatar object uploaded before a
//! failed profile insert may be left behind; it is unreferenced and inert.

use tracing::{error, info, warn};

use crate::common::ProvisionError;
use crate::domains::staff::badge::{next_code, StaffRole};
use crate::domains::staff::models::NewProfile;
use crate::kernel::{NewAccount, ServerDeps};

/// Avatar artifact supplied with a creation request. Transport already
/// decoded; this is just the raw bytes and the original file name.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CreateStaffRequest {
    pub display_name: String,
    pub email: String,
    pub role: StaffRole,
    pub password: String,
    pub location_id: Option<String>,
    pub avatar: Option<AvatarUpload>,
}

/// Provision a new staff member.
///
/// Returns the new account id (which is also the profile id). On a failure
/// after the account exists, the account is rolled back before the error is
/// surfaced; the happy path leaves no partial state visible to callers.
pub async fn create_staff(
    request: CreateStaffRequest,
    deps: &ServerDeps,
) -> Result<String, ProvisionError> {
    validate(&request)?;

    info!(
        email = %request.email,
        role = request.role.as_str(),
        "Provisioning staff member"
    );

    // First external mutation. Failure here is terminal: nothing to undo yet.
    let account_id = deps
        .identity
        .create_account(NewAccount {
            email: request.email.clone(),
            password: request.password.clone(),
            display_name: request.display_name.clone(),
            role: request.role.as_str().to_string(),
        })
        .await
        .map_err(ProvisionError::IdentityProvider)?;

    match insert_profile_for_account(&account_id, &request, deps).await {
        Ok(()) => {
            info!(account_id = %account_id, "Staff member provisioned");
            Ok(account_id)
        }
        Err(cause) => {
            // Compensate: remove the account so no orphaned credentials
            // remain. A compensation failure is logged, never surfaced; the
            // caller must see the original cause.
            if let Err(e) = deps.identity.delete_account(&account_id).await {
                error!(
                    account_id = %account_id,
                    "Compensation failed, orphaned account remains: {}", e
                );
            }
            Err(ProvisionError::compensated(cause))
        }
    }
}

fn validate(request: &CreateStaffRequest) -> Result<(), ProvisionError> {
    if request.display_name.trim().is_empty() {
        return Err(ProvisionError::Validation(
            "display_name is required".to_string(),
        ));
    }
    if request.email.trim().is_empty() {
        return Err(ProvisionError::Validation("email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(ProvisionError::Validation(
            "password is required".to_string(),
        ));
    }
    if request.location_id.is_none() && !request.role.is_location_exempt() {
        return Err(ProvisionError::Validation(format!(
            "location_id is required for role '{}'",
            request.role.as_str()
        )));
    }
    Ok(())
}

/// Steps 3-5: badge allocation, best-effort avatar upload, profile insert.
/// Any error returned here triggers account compensation in the caller.
async fn insert_profile_for_account(
    account_id: &str,
    request: &CreateStaffRequest,
    deps: &ServerDeps,
) -> Result<(), ProvisionError> {
    let existing = deps
        .profiles
        .badge_codes_with_prefix(request.role.prefix())
        .await
        .map_err(ProvisionError::AllocationLookup)?;
    let badge_code = next_code(request.role, &existing);

    // Avatar upload is tolerated to fail: a missing picture is not worth
    // aborting provisioning over.
    let avatar_url = match &request.avatar {
        Some(avatar) => {
            let key = format!("{}/{}", account_id, avatar.file_name);
            match deps.object_store.upload(&key, avatar.bytes.clone()).await {
                Ok(url) => Some(url),
                Err(e) => {
                    let err = ProvisionError::ObjectStore(e);
                    warn!(account_id = %account_id, "{}; continuing without avatar", err);
                    None
                }
            }
        }
        None => None,
    };

    deps.profiles
        .insert_profile(NewProfile {
            id: account_id.to_string(),
            display_name: request.display_name.clone(),
            email: request.email.clone(),
            role: request.role.as_str().to_string(),
            badge_code,
            location_id: request.location_id.clone(),
            password_length: request.password.chars().count() as i32,
            avatar_url,
        })
        .await
        .map_err(ProvisionError::Storage)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{
        MockIdentityProvider, MockObjectStore, MockProfileStore, TestDependencies,
    };

    fn request(role: StaffRole, location_id: Option<&str>) -> CreateStaffRequest {
        CreateStaffRequest {
            display_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            role,
            password: "secret123".to_string(),
            location_id: location_id.map(|s| s.to_string()),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_first_trainer_gets_st_tr_1() {
        let test_deps = TestDependencies::new()
            .mock_identity(MockIdentityProvider::new().with_next_id("acct-1"));
        let deps = test_deps.to_deps();

        let id = create_staff(request(StaffRole::Trainer, Some("loc-1")), &deps)
            .await
            .unwrap();

        assert_eq!(id, "acct-1");
        let profile = test_deps.profiles.profile("acct-1").unwrap();
        assert_eq!(profile.badge_code, "ST-TR-1");
        assert_eq!(profile.email, "jane@x.com");
        assert_eq!(profile.password_length, 9);
        assert_eq!(profile.avatar_url, None);
    }

    #[tokio::test]
    async fn test_badge_continues_from_existing_codes() {
        let test_deps = TestDependencies::new().mock_profiles(
            MockProfileStore::new().with_badge_codes("trainer", &["ST-TR-2", "ST-TR-5"]),
        );
        let deps = test_deps.to_deps();

        let id = create_staff(request(StaffRole::Trainer, Some("loc-1")), &deps)
            .await
            .unwrap();

        let profile = test_deps.profiles.profile(&id).unwrap();
        assert_eq!(profile.badge_code, "ST-TR-6");
    }

    #[tokio::test]
    async fn test_admin_needs_no_location_and_gets_bare_prefix() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.to_deps();

        let id = create_staff(request(StaffRole::Admin, None), &deps)
            .await
            .unwrap();

        let profile = test_deps.profiles.profile(&id).unwrap();
        assert_eq!(profile.badge_code, "PTSI");
        assert_eq!(profile.location_id, None);
    }

    #[tokio::test]
    async fn test_missing_location_rejected_before_any_external_call() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.to_deps();

        let err = create_staff(request(StaffRole::Coach, None), &deps)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::Validation(_)));
        assert_eq!(test_deps.identity.call_count(), 0);
        assert_eq!(test_deps.profiles.profile_count(), 0);
    }

    #[tokio::test]
    async fn test_identity_failure_is_terminal_with_no_profile() {
        let test_deps =
            TestDependencies::new().mock_identity(MockIdentityProvider::new().failing_create());
        let deps = test_deps.to_deps();

        let err = create_staff(request(StaffRole::Trainer, Some("loc-1")), &deps)
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::IdentityProvider(_)));
        assert_eq!(test_deps.profiles.profile_count(), 0);
        assert!(test_deps.identity.delete_calls().is_empty());
    }

    #[tokio::test]
    async fn test_profile_insert_failure_rolls_back_account() {
        let test_deps = TestDependencies::new()
            .mock_identity(MockIdentityProvider::new().with_next_id("acct-9"))
            .mock_profiles(MockProfileStore::new().failing_insert());
        let deps = test_deps.to_deps();

        let err = create_staff(request(StaffRole::Trainer, Some("loc-1")), &deps)
            .await
            .unwrap_err();

        match err {
            ProvisionError::PartialFailureCompensated(cause) => {
                assert!(matches!(*cause, ProvisionError::Storage(_)));
            }
            other => panic!("expected compensated failure, got {:?}", other),
        }
        assert!(!test_deps.identity.account_exists("acct-9"));
        assert_eq!(test_deps.identity.delete_calls(), vec!["acct-9"]);
    }

    #[tokio::test]
    async fn test_badge_lookup_failure_rolls_back_account() {
        let test_deps = TestDependencies::new()
            .mock_identity(MockIdentityProvider::new().with_next_id("acct-3"))
            .mock_profiles(MockProfileStore::new().failing_badge_lookup());
        let deps = test_deps.to_deps();

        let err = create_staff(request(StaffRole::Trainer, Some("loc-1")), &deps)
            .await
            .unwrap_err();

        match err {
            ProvisionError::PartialFailureCompensated(cause) => {
                assert!(matches!(*cause, ProvisionError::AllocationLookup(_)));
            }
            other => panic!("expected compensated failure, got {:?}", other),
        }
        assert!(!test_deps.identity.account_exists("acct-3"));
    }

    #[tokio::test]
    async fn test_avatar_upload_failure_is_tolerated() {
        let test_deps =
            TestDependencies::new().mock_object_store(MockObjectStore::new().failing_upload());
        let deps = test_deps.to_deps();

        let mut req = request(StaffRole::Trainer, Some("loc-1"));
        req.avatar = Some(AvatarUpload {
            file_name: "me.png".to_string(),
            bytes: vec![1, 2, 3],
        });

        let id = create_staff(req, &deps).await.unwrap();

        let profile = test_deps.profiles.profile(&id).unwrap();
        assert_eq!(profile.avatar_url, None);
    }

    #[tokio::test]
    async fn test_avatar_uploaded_under_account_key() {
        let test_deps = TestDependencies::new()
            .mock_identity(MockIdentityProvider::new().with_next_id("acct-7"));
        let deps = test_deps.to_deps();

        let mut req = request(StaffRole::Trainer, Some("loc-1"));
        req.avatar = Some(AvatarUpload {
            file_name: "me.png".to_string(),
            bytes: vec![1, 2, 3],
        });

        create_staff(req, &deps).await.unwrap();

        assert!(test_deps.object_store.was_uploaded("acct-7/me.png"));
        let profile = test_deps.profiles.profile("acct-7").unwrap();
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://cdn.test/acct-7/me.png")
        );
    }
}
