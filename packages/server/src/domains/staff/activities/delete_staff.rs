//! Delete staff action - deprovisions an account/profile pair.
//!
//! Fail-closed up to the account deletion: if the identity provider refuses,
//! the profile is left intact so the pair stays consistent. Everything after
//! a confirmed account deletion is best-effort cleanup.

use tracing::{info, warn};

use crate::common::ProvisionError;
use crate::domains::staff::activities::{reconcile_badge_counters, ReconcileMode};
use crate::kernel::ServerDeps;

/// Remove a staff member's account and profile and re-baseline the badge
/// counters. Succeeds once the account is confirmed deleted, regardless of
/// downstream cleanup outcomes.
pub async fn delete_staff(id: &str, deps: &ServerDeps) -> Result<(), ProvisionError> {
    if id.trim().is_empty() {
        return Err(ProvisionError::Validation("id is required".to_string()));
    }

    // Diagnostic lookup only; deletion proceeds whether or not it works.
    match deps.profiles.find_profile(id).await {
        Ok(Some(profile)) => {
            info!(
                id = %id,
                role = %profile.role,
                badge_code = %profile.badge_code,
                "Deprovisioning staff member"
            );
        }
        Ok(None) => warn!(id = %id, "No profile found for account being deleted"),
        Err(e) => warn!(id = %id, "Profile lookup failed before deletion: {}", e),
    }

    deps.identity
        .delete_account(id)
        .await
        .map_err(ProvisionError::IdentityProvider)?;

    if let Err(e) = deps.profiles.delete_profile(id).await {
        warn!(id = %id, "Profile row deletion failed, continuing: {}", e);
    }

    if let Err(e) = reconcile_badge_counters(ReconcileMode::Incremental, deps).await {
        warn!(id = %id, "Post-deletion reconciliation failed: {}", e);
    }

    info!(id = %id, "Staff member deprovisioned");
    Ok(())
}
