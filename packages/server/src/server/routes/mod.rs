// HTTP routes
pub mod health;
pub mod invites;
pub mod staff;

pub use health::*;
pub use invites::*;
pub use staff::*;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::common::ProvisionError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a provisioning error to a transport response. The human-readable
/// message crosses the boundary; store-level diagnostics stay in the logs.
pub fn error_response(err: ProvisionError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        ProvisionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProvisionError::NotFound(_) => StatusCode::NOT_FOUND,
        ProvisionError::IdentityProvider(_)
        | ProvisionError::Storage(_)
        | ProvisionError::ObjectStore(_)
        | ProvisionError::AllocationLookup(_) => StatusCode::BAD_GATEWAY,
        ProvisionError::PartialFailureCompensated(_)
        | ProvisionError::PartialFailureUncompensated(_)
        | ProvisionError::Reconciliation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
