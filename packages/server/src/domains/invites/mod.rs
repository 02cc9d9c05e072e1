//! Onboarding invite links.

pub mod token;

pub use token::{InvitePayload, InviteTokenError};
