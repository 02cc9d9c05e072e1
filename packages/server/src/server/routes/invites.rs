use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domains::invites::{InvitePayload, InviteTokenError};
use crate::domains::locations::Location;
use crate::domains::staff::badge::StaffRole;
use crate::server::app::AppState;
use crate::server::routes::ErrorResponse;

#[derive(Deserialize)]
pub struct CreateInviteBody {
    pub role: StaffRole,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct CreateInviteResponse {
    pub token: String,
}

#[derive(Serialize)]
pub struct DecodeInviteResponse {
    pub role: StaffRole,
    pub location_id: Option<String>,
    pub name: Option<String>,
    /// Whether the referenced location is already claimed by an owner.
    /// Supplied here from the locations table, not by the codec.
    pub status: String,
}

fn invite_error(err: InviteTokenError) -> Response {
    let status = match err {
        InviteTokenError::Malformed => StatusCode::BAD_REQUEST,
        InviteTokenError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// POST /invites
pub async fn create_invite_handler(Json(body): Json<CreateInviteBody>) -> Response {
    match InvitePayload::new(body.role, body.location_id, body.name) {
        Ok(payload) => Json(CreateInviteResponse {
            token: payload.encode(),
        })
        .into_response(),
        Err(err) => invite_error(err),
    }
}

/// GET /invites/:token
pub async fn decode_invite_handler(
    Extension(state): Extension<AppState>,
    Path(token): Path<String>,
) -> Response {
    let payload = match InvitePayload::decode(&token) {
        Ok(payload) => payload,
        Err(err) => return invite_error(err),
    };

    let status = match &payload.location_id {
        Some(location_id) => match Location::find_by_id(location_id, &state.db_pool).await {
            Ok(Some(location)) if location.is_claimed() => "claimed".to_string(),
            Ok(Some(_)) => "open".to_string(),
            Ok(None) => "unknown".to_string(),
            Err(e) => {
                warn!(location_id = %location_id, "Location lookup failed: {}", e);
                "unknown".to_string()
            }
        },
        None => "unknown".to_string(),
    };

    Json(DecodeInviteResponse {
        role: payload.role,
        location_id: payload.location_id,
        name: payload.name,
        status,
    })
    .into_response()
}
