//! Staff domain: roles, badge allocation, profiles, provisioning activities.

pub mod activities;
pub mod badge;
pub mod models;
