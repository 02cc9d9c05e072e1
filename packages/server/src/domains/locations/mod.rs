//! Gym locations. Read-only from the provisioning core.

pub mod models;

pub use models::Location;
