use serde::{Deserialize, Serialize};

/// User record returned by the GoTrue admin API.
///
/// Only the fields the server cares about are modeled; everything else in the
/// provider's response is ignored during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<serde_json::Value>,
}

/// Body for `POST /admin/users`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserBody {
    pub email: String,
    pub password: String,
    pub email_confirm: bool,
    pub user_metadata: serde_json::Value,
}

/// Body for `PUT /admin/users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Default)]
pub struct UpdateUserBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<serde_json::Value>,
}
