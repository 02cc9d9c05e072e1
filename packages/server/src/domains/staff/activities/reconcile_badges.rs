//! Badge counter reconciliation.
//!
//! The counters are derived state: the profiles table is the ground truth.
//! This rebuild is the system's only consistency-repair mechanism for the
//! badge namespace; it heals drift after the fact, it does not prevent two
//! concurrent allocations from colliding.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::common::ProvisionError;
use crate::domains::staff::badge::{suffix_or_zero, StaffRole};
use crate::kernel::ServerDeps;

/// How the reconciliation was triggered. Both modes run the same recompute;
/// the mode only drives log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileMode {
    /// Light drift-correction after a single deletion.
    Incremental,
    /// Ground-truth rebuild on the periodic schedule or manual trigger.
    Full,
}

/// Result of a reconciliation run: the new per-prefix baselines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub counters: BTreeMap<String, i64>,
}

/// Recompute every per-prefix maximum from the full set of profile badge
/// codes and persist it as the new counter baseline. Idempotent: with no
/// intervening writes, a second run produces the same state.
pub async fn reconcile_badge_counters(
    mode: ReconcileMode,
    deps: &ServerDeps,
) -> Result<ReconcileSummary, ProvisionError> {
    let codes = deps
        .profiles
        .all_badge_codes()
        .await
        .map_err(ProvisionError::Reconciliation)?;

    let mut counters = BTreeMap::new();
    for prefix in StaffRole::counter_prefixes() {
        let needle = format!("{}-", prefix);
        let max = codes
            .iter()
            .filter(|code| code.starts_with(&needle))
            .map(|code| suffix_or_zero(code, prefix))
            .max()
            .unwrap_or(0) as i64;
        counters.insert(prefix.to_string(), max);
    }

    for (prefix, max) in &counters {
        deps.profiles
            .upsert_counter(prefix, *max)
            .await
            .map_err(ProvisionError::Reconciliation)?;
    }

    // Report what actually landed, not what we computed.
    let persisted: BTreeMap<String, i64> = deps
        .profiles
        .counters()
        .await
        .map_err(ProvisionError::Reconciliation)?
        .into_iter()
        .collect();

    match mode {
        ReconcileMode::Incremental => {
            debug!(prefixes = persisted.len(), "Badge counters re-baselined")
        }
        ReconcileMode::Full => info!(prefixes = persisted.len(), "Badge counters rebuilt"),
    }

    Ok(ReconcileSummary {
        counters: persisted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::stub_profile;
    use crate::kernel::{MockProfileStore, TestDependencies};

    #[tokio::test]
    async fn test_rebuild_from_ground_truth() {
        let test_deps = TestDependencies::new().mock_profiles(
            MockProfileStore::new()
                .with_badge_codes("trainer", &["ST-TR-1", "ST-TR-4"])
                .with_badge_codes("coach", &["CS-2"]),
        );
        let deps = test_deps.to_deps();

        let summary = reconcile_badge_counters(ReconcileMode::Full, &deps)
            .await
            .unwrap();

        assert_eq!(summary.counters.get("ST-TR"), Some(&4));
        assert_eq!(summary.counters.get("CS"), Some(&2));
        assert_eq!(summary.counters.get("CL"), Some(&0));
        assert_eq!(test_deps.profiles.counter_state(), summary.counters);
    }

    #[tokio::test]
    async fn test_malformed_suffixes_count_as_zero() {
        let test_deps = TestDependencies::new().mock_profiles(
            MockProfileStore::new().with_badge_codes("coach", &["CS-3", "CS-x", "CS-"]),
        );
        let deps = test_deps.to_deps();

        let summary = reconcile_badge_counters(ReconcileMode::Full, &deps)
            .await
            .unwrap();

        assert_eq!(summary.counters.get("CS"), Some(&3));
    }

    #[tokio::test]
    async fn test_idempotent() {
        let test_deps = TestDependencies::new().mock_profiles(
            MockProfileStore::new()
                .with_badge_codes("trainer", &["ST-TR-9"])
                .with_badge_codes("front_desk", &["ST-FD-2"]),
        );
        let deps = test_deps.to_deps();

        let first = reconcile_badge_counters(ReconcileMode::Full, &deps)
            .await
            .unwrap();
        let state_after_first = test_deps.profiles.counter_state();

        let second = reconcile_badge_counters(ReconcileMode::Full, &deps)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(test_deps.profiles.counter_state(), state_after_first);
    }

    #[tokio::test]
    async fn test_prefixes_sharing_a_stem_stay_separate() {
        let test_deps = TestDependencies::new().mock_profiles(
            MockProfileStore::new()
                .with_badge_codes("trainer", &["ST-TR-5"])
                .with_badge_codes("closer", &["ST-CL-7"])
                .with_badge_codes("front_desk", &["ST-FD-1"]),
        );
        let deps = test_deps.to_deps();

        let summary = reconcile_badge_counters(ReconcileMode::Full, &deps)
            .await
            .unwrap();

        assert_eq!(summary.counters.get("ST-TR"), Some(&5));
        assert_eq!(summary.counters.get("ST-CL"), Some(&7));
        assert_eq!(summary.counters.get("ST-FD"), Some(&1));
    }

    #[tokio::test]
    async fn test_empty_system_zeroes_everything() {
        let test_deps = TestDependencies::new();
        let deps = test_deps.to_deps();

        let summary = reconcile_badge_counters(ReconcileMode::Incremental, &deps)
            .await
            .unwrap();

        assert!(summary.counters.values().all(|&v| v == 0));
    }

    #[tokio::test]
    async fn test_exempt_bare_codes_do_not_create_counters() {
        let test_deps = TestDependencies::new().mock_profiles(
            MockProfileStore::new()
                .with_badge_codes("admin", &["PTSI"])
                .with_badge_codes("ptsi-intern", &["PTSI-INT"]),
        );
        let deps = test_deps.to_deps();

        let summary = reconcile_badge_counters(ReconcileMode::Full, &deps)
            .await
            .unwrap();

        assert!(!summary.counters.contains_key("PTSI"));
        assert!(!summary.counters.contains_key("PTSI-INT"));
    }
}
