use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::common::ProvisionError;
use crate::domains::staff::activities::{
    create_staff, delete_staff, reconcile_badge_counters, update_staff, AvatarUpload,
    CreateStaffRequest, ReconcileMode, UpdateStaffRequest,
};
use crate::domains::staff::badge::StaffRole;
use crate::server::app::AppState;
use crate::server::routes::error_response;

#[derive(Deserialize)]
pub struct CreateStaffBody {
    pub display_name: String,
    pub email: String,
    pub role: StaffRole,
    pub password: String,
    #[serde(default)]
    pub location_id: Option<String>,
    /// Original file name of the avatar, if one is attached.
    #[serde(default)]
    pub avatar_file_name: Option<String>,
    /// Avatar bytes, standard base64.
    #[serde(default)]
    pub avatar_base64: Option<String>,
}

#[derive(Serialize)]
pub struct CreateStaffResponse {
    pub account_id: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// POST /staff
pub async fn create_staff_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<CreateStaffBody>,
) -> Response {
    let avatar = match decode_avatar(&body) {
        Ok(avatar) => avatar,
        Err(err) => return error_response(err).into_response(),
    };

    let request = CreateStaffRequest {
        display_name: body.display_name,
        email: body.email,
        role: body.role,
        password: body.password,
        location_id: body.location_id,
        avatar,
    };

    match create_staff(request, &state.deps).await {
        Ok(account_id) => (StatusCode::CREATED, Json(CreateStaffResponse { account_id }))
            .into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

fn decode_avatar(body: &CreateStaffBody) -> Result<Option<AvatarUpload>, ProvisionError> {
    match (&body.avatar_file_name, &body.avatar_base64) {
        (Some(file_name), Some(encoded)) => {
            let bytes = STANDARD.decode(encoded).map_err(|_| {
                ProvisionError::Validation("avatar_base64 is not valid base64".to_string())
            })?;
            Ok(Some(AvatarUpload {
                file_name: file_name.clone(),
                bytes,
            }))
        }
        (None, None) => Ok(None),
        _ => Err(ProvisionError::Validation(
            "avatar_file_name and avatar_base64 must be supplied together".to_string(),
        )),
    }
}

#[derive(Deserialize, Default)]
pub struct UpdateStaffBody {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<StaffRole>,
    #[serde(default)]
    pub password: Option<String>,
}

/// PATCH /staff/:id
pub async fn update_staff_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStaffBody>,
) -> Response {
    let request = UpdateStaffRequest {
        id,
        display_name: body.display_name,
        email: body.email,
        role: body.role,
        password: body.password,
    };

    match update_staff(request, &state.deps).await {
        Ok(profile) => Json(profile).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// DELETE /staff/:id
pub async fn delete_staff_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
) -> Response {
    match delete_staff(&id, &state.deps).await {
        Ok(()) => Json(SuccessResponse { success: true }).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// POST /badges/reconcile — external full-rebuild trigger.
pub async fn reconcile_handler(Extension(state): Extension<AppState>) -> Response {
    match reconcile_badge_counters(ReconcileMode::Full, &state.deps).await {
        Ok(_) => Json(SuccessResponse { success: true }).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}
