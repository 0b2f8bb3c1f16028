//! Decoded bearer payload of the payload-based login flow.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The user object nested inside a login payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The full JSON record carried base64-encoded in the `payload` parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub user: PayloadUser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_date: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
