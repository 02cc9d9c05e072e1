//! Update staff action - applies a partial update across both stores.
//!
//! The account side (email/password) commits first; the profile patch comes
//! second and is NOT rolled back if it fails. This asymmetry with creation is
//! deliberate: an account that is ahead of its profile is recoverable by
//! retrying the update, whereas creation must never leave an orphaned login.

use tracing::info;

use crate::common::ProvisionError;
use crate::domains::staff::badge::{next_code, StaffRole};
use crate::domains::staff::models::{Profile, ProfilePatch};
use crate::kernel::{AccountPatch, ServerDeps};

/// Partial update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateStaffRequest {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<StaffRole>,
    pub password: Option<String>,
}

/// Apply the supplied fields, returning the updated profile.
///
/// A role change re-allocates the badge code under the new role's prefix
/// using the same allocator as creation.
pub async fn update_staff(
    request: UpdateStaffRequest,
    deps: &ServerDeps,
) -> Result<Profile, ProvisionError> {
    if request.id.trim().is_empty() {
        return Err(ProvisionError::Validation("id is required".to_string()));
    }

    let account_patch = AccountPatch {
        email: request.email.clone(),
        password: request.password.clone(),
    };

    // Credentials first. Failure here is terminal and nothing else is
    // attempted, so no compensation is needed.
    let account_updated = if account_patch.is_empty() {
        false
    } else {
        deps.identity
            .update_account(&request.id, account_patch)
            .await
            .map_err(ProvisionError::IdentityProvider)?;
        true
    };

    let mut patch = ProfilePatch {
        display_name: request.display_name.clone(),
        email: request.email.clone(),
        password_length: request
            .password
            .as_ref()
            .map(|p| p.chars().count() as i32),
        ..Default::default()
    };

    if let Some(role) = request.role {
        let existing = deps
            .profiles
            .badge_codes_with_prefix(role.prefix())
            .await
            .map_err(ProvisionError::AllocationLookup)
            .map_err(|e| surface(e, account_updated))?;

        patch.role = Some(role.as_str().to_string());
        patch.badge_code = Some(next_code(role, &existing));
    }

    let profile = if patch.is_empty() {
        deps.profiles
            .find_profile(&request.id)
            .await
            .map_err(ProvisionError::Storage)
            .map_err(|e| surface(e, account_updated))?
            .ok_or_else(|| ProvisionError::NotFound(request.id.clone()))?
    } else {
        deps.profiles
            .update_profile(&request.id, patch)
            .await
            .map_err(ProvisionError::Storage)
            .map_err(|e| surface(e, account_updated))?
    };

    info!(id = %profile.id, "Staff member updated");
    Ok(profile)
}

/// Once the account side has committed, later failures leave the stores
/// split; mark them so callers know no rollback happened.
fn surface(cause: ProvisionError, account_updated: bool) -> ProvisionError {
    if account_updated {
        ProvisionError::uncompensated(cause)
    } else {
        cause
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::stub_profile;
    use crate::kernel::{MockIdentityProvider, MockProfileStore, TestDependencies};

    #[tokio::test]
    async fn test_role_change_reallocates_badge_under_new_prefix() {
        let test_deps = TestDependencies::new().mock_profiles(
            MockProfileStore::new()
                .with_profile(stub_profile("p-1", "client", "CL-4"))
                .with_badge_codes("coach", &["CS-1", "CS-2"]),
        );
        let deps = test_deps.to_deps();

        let profile = update_staff(
            UpdateStaffRequest {
                id: "p-1".to_string(),
                role: Some(StaffRole::Coach),
                ..Default::default()
            },
            &deps,
        )
        .await
        .unwrap();

        assert_eq!(profile.role, "coach");
        assert_eq!(profile.badge_code, "CS-3");
        // No email/password supplied: the identity provider is untouched.
        assert_eq!(test_deps.identity.call_count(), 0);
    }

    #[tokio::test]
    async fn test_email_and_password_update_account_first() {
        let test_deps = TestDependencies::new()
            .mock_profiles(MockProfileStore::new().with_profile(stub_profile(
                "p-1",
                "trainer",
                "ST-TR-1",
            )));
        let deps = test_deps.to_deps();

        let profile = update_staff(
            UpdateStaffRequest {
                id: "p-1".to_string(),
                email: Some("new@x.com".to_string()),
                password: Some("longersecret".to_string()),
                ..Default::default()
            },
            &deps,
        )
        .await
        .unwrap();

        let updates = test_deps.identity.update_calls();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "p-1");
        assert_eq!(updates[0].1.email.as_deref(), Some("new@x.com"));

        assert_eq!(profile.email, "new@x.com");
        assert_eq!(profile.password_length, 12);
        // Role untouched, badge untouched.
        assert_eq!(profile.badge_code, "ST-TR-1");
    }

    #[tokio::test]
    async fn test_account_update_failure_is_terminal() {
        let test_deps = TestDependencies::new()
            .mock_identity(MockIdentityProvider::new().failing_update())
            .mock_profiles(MockProfileStore::new().with_profile(stub_profile(
                "p-1",
                "trainer",
                "ST-TR-1",
            )));
        let deps = test_deps.to_deps();

        let err = update_staff(
            UpdateStaffRequest {
                id: "p-1".to_string(),
                email: Some("new@x.com".to_string()),
                display_name: Some("Changed".to_string()),
                ..Default::default()
            },
            &deps,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ProvisionError::IdentityProvider(_)));
        // Profile untouched.
        let profile = test_deps.profiles.profile("p-1").unwrap();
        assert_eq!(profile.display_name, "Stub p-1");
    }

    #[tokio::test]
    async fn test_profile_failure_after_account_commit_is_uncompensated() {
        let test_deps = TestDependencies::new().mock_profiles(
            MockProfileStore::new()
                .with_profile(stub_profile("p-1", "trainer", "ST-TR-1"))
                .failing_update(),
        );
        let deps = test_deps.to_deps();

        let err = update_staff(
            UpdateStaffRequest {
                id: "p-1".to_string(),
                email: Some("new@x.com".to_string()),
                ..Default::default()
            },
            &deps,
        )
        .await
        .unwrap_err();

        match err {
            ProvisionError::PartialFailureUncompensated(cause) => {
                assert!(matches!(*cause, ProvisionError::Storage(_)));
            }
            other => panic!("expected uncompensated failure, got {:?}", other),
        }
        // The account-side change stays committed; no rollback call was made.
        assert_eq!(test_deps.identity.update_calls().len(), 1);
        assert!(test_deps.identity.delete_calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_update_returns_current_profile() {
        let test_deps = TestDependencies::new()
            .mock_profiles(MockProfileStore::new().with_profile(stub_profile(
                "p-1",
                "va",
                "VA-2",
            )));
        let deps = test_deps.to_deps();

        let profile = update_staff(
            UpdateStaffRequest {
                id: "p-1".to_string(),
                ..Default::default()
            },
            &deps,
        )
        .await
        .unwrap();

        assert_eq!(profile.badge_code, "VA-2");
        assert_eq!(test_deps.identity.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_id_rejected() {
        let deps = TestDependencies::new().to_deps();
        let err = update_staff(UpdateStaffRequest::default(), &deps)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_profile_yields_not_found() {
        let deps = TestDependencies::new().to_deps();
        let err = update_staff(
            UpdateStaffRequest {
                id: "ghost".to_string(),
                ..Default::default()
            },
            &deps,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProvisionError::NotFound(_)));
    }
}
