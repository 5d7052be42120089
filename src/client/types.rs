//! Request and response payloads for the auth API. Login and register requests
//! carry passwords and API keys carry secrets, so none of these may be logged
//! with their raw contents.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Result of login, register and refresh. `success: false` is a failure even on 2xx.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    pub user: User,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Wire shape of `AuthResponse`; rejected responses may omit the user.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct AuthEnvelope {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /v1/auth/me`.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct CurrentUserResponse {
    pub user: User,
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct APIKey {
    pub id: String,
    pub name: String,
    /// Full secret in the creation response, a masked prefix afterwards.
    pub key: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_id: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
    pub is_active: bool,
}

impl fmt::Debug for APIKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("APIKey")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("key", &"***")
            .field("permissions", &self.permissions)
            .field("graph_id", &self.graph_id)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("last_used_at", &self.last_used_at)
            .field("is_active", &self.is_active)
            .finish()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAPIKeyRequest {
    pub name: String,
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_uses_camel_case_timestamps() {
        let user: User = serde_json::from_value(json!({
            "id": "1",
            "email": "a@b.com",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }))
        .expect("Failed to deserialize");

        assert_eq!(user.name, None);
        assert_eq!(user.created_at, "2024-01-01T00:00:00Z");
        assert_eq!(user.updated_at, "2024-01-02T00:00:00Z");
    }

    #[test]
    fn user_tolerates_missing_timestamps() {
        let user: User = serde_json::from_value(json!({"id": "1", "email": "a@b.com"}))
            .expect("Failed to deserialize");
        assert_eq!(user.id, "1");
        assert!(user.created_at.is_empty());
    }

    #[test]
    fn register_request_omits_absent_name() {
        let request = RegisterRequest {
            email: "a@b.com",
            password: "pw",
            name: None,
        };
        let value = serde_json::to_value(&request).expect("Failed to serialize");
        assert_eq!(value, json!({"email": "a@b.com", "password": "pw"}));
    }

    #[test]
    fn api_key_debug_masks_secret() {
        let key: APIKey = serde_json::from_value(json!({
            "id": "key-1",
            "name": "ci",
            "key": "rfs_live_0123456789abcdef",
            "permissions": ["read"],
            "graphId": "kg1",
            "createdAt": "2024-01-01T00:00:00Z",
            "isActive": true
        }))
        .expect("Failed to deserialize");

        assert_eq!(key.graph_id.as_deref(), Some("kg1"));
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("rfs_live_0123456789abcdef"));
        assert!(rendered.contains("key-1"));
    }

    #[test]
    fn create_request_serializes_camel_case() {
        let request = CreateAPIKeyRequest {
            name: "ci".to_string(),
            permissions: vec!["read".to_string(), "write".to_string()],
            graph_id: Some("kg1".to_string()),
            expires_at: None,
        };
        let value = serde_json::to_value(&request).expect("Failed to serialize");
        assert_eq!(
            value,
            json!({"name": "ci", "permissions": ["read", "write"], "graphId": "kg1"})
        );
    }
}
