//! Staff provisioning activities.
//!
//! Each activity is a multi-step operation across the identity provider and
//! the profile store. They share one discipline: validate before any external
//! call, mutate the store we can undo first, and log (never swallow silently)
//! every best-effort step.

pub mod create_staff;
pub mod delete_staff;
pub mod reconcile_badges;
pub mod update_staff;

pub use create_staff::{create_staff, AvatarUpload, CreateStaffRequest};
pub use delete_staff::delete_staff;
pub use reconcile_badges::{reconcile_badge_counters, ReconcileMode, ReconcileSummary};
pub use update_staff::{update_staff, UpdateStaffRequest};
