//! Stateless invite token codec.
//!
//! An invite is a self-contained payload (role, optional location, optional
//! invitee name, issue time) serialized to JSON and base64url-encoded without
//! padding. It is an encoding, not a signature: anyone holding a token can
//! decode it, and there is no expiry or revocation. The token never touches
//! storage.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domains::staff::badge::StaffRole;

#[derive(Error, Debug)]
pub enum InviteTokenError {
    #[error("Malformed invite token")]
    Malformed,

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Invitation payload carried inside the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitePayload {
    pub role: StaffRole,
    pub location_id: Option<String>,
    pub name: Option<String>,
    pub issued_at: DateTime<Utc>,
}

impl InvitePayload {
    /// Build a payload, enforcing that non-exempt roles carry a location.
    pub fn new(
        role: StaffRole,
        location_id: Option<String>,
        name: Option<String>,
    ) -> Result<Self, InviteTokenError> {
        if location_id.is_none() && !role.is_location_exempt() {
            return Err(InviteTokenError::Validation(format!(
                "location_id is required for role '{}'",
                role.as_str()
            )));
        }

        Ok(Self {
            role,
            location_id,
            name,
            issued_at: Utc::now(),
        })
    }

    /// Encode the payload as a URL-safe token.
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).expect("invite payload serializes");
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a token back to a payload. Fails on bad base64 or bad JSON.
    pub fn decode(token: &str) -> Result<Self, InviteTokenError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| InviteTokenError::Malformed)?;
        serde_json::from_slice(&bytes).map_err(|_| InviteTokenError::Malformed)
    }
}
