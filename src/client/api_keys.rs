//! API-key management. Keys are long-lived credentials separate from the
//! session; the full secret is only present in the creation response.

use super::{
    decode,
    types::{APIKey, CreateAPIKeyRequest},
    AuthClient,
};
use crate::error::{AuthError, Operation};
use reqwest::Method;
use url::Url;

const API_KEYS_PATH: &str = "/v1/auth/api-keys";

impl AuthClient {
    /// Create an API key. The returned key is the only copy of the secret.
    ///
    /// # Errors
    /// Returns a `CreateApiKeyFailed` error on a non-success status or a network failure.
    pub async fn create_api_key(&self, request: &CreateAPIKeyRequest) -> Result<APIKey, AuthError> {
        let builder = self.request(Method::POST, API_KEYS_PATH).json(request);
        let response = self.send(Operation::CreateApiKey, builder).await?;

        decode(Operation::CreateApiKey, response).await
    }

    /// List the caller's API keys with masked secrets.
    ///
    /// # Errors
    /// Returns a `ListApiKeysFailed` error on a non-success status or a network failure.
    pub async fn api_keys(&self) -> Result<Vec<APIKey>, AuthError> {
        let builder = self.request(Method::GET, API_KEYS_PATH);
        let response = self.send(Operation::ListApiKeys, builder).await?;

        decode(Operation::ListApiKeys, response).await
    }

    /// Revoke an API key by id.
    ///
    /// # Errors
    /// Returns a `RevokeApiKeyFailed` error on a non-success status or a network failure.
    pub async fn revoke_api_key(&self, id: &str) -> Result<(), AuthError> {
        let url = self.api_key_url(id)?;
        let builder = self.http.request(Method::DELETE, url);
        self.send(Operation::RevokeApiKey, builder).await?;

        Ok(())
    }

    /// `/v1/auth/api-keys/{id}` with the id encoded as one path segment.
    fn api_key_url(&self, id: &str) -> Result<Url, AuthError> {
        let collection = self.endpoint(API_KEYS_PATH);

        let mut url = Url::parse(&collection).map_err(|err| AuthError::InvalidBaseUrl {
            url: collection.clone(),
            reason: err.to_string(),
        })?;

        url.path_segments_mut()
            .map_err(|()| AuthError::InvalidBaseUrl {
                url: collection.clone(),
                reason: "URL cannot be a base".to_string(),
            })?
            .push(id);

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthErrorKind;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn key_json(key: &str) -> serde_json::Value {
        json!({
            "id": "key-1",
            "name": "ci",
            "key": key,
            "permissions": ["read"],
            "createdAt": "2024-01-01T00:00:00Z",
            "isActive": true
        })
    }

    #[test]
    fn api_key_url_encodes_id() -> Result<(), AuthError> {
        let client = AuthClient::new("https://api.test.com/")?;
        let url = client.api_key_url("key/1 2")?;
        assert_eq!(
            url.as_str(),
            "https://api.test.com/v1/auth/api-keys/key%2F1%202"
        );
        Ok(())
    }

    #[tokio::test]
    async fn create_api_key_returns_full_secret() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/api-keys"))
            .and(body_json(json!({"name": "ci", "permissions": ["read"]})))
            .respond_with(ResponseTemplate::new(201).set_body_json(key_json("rfs_full_secret")))
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri())?;
        let key = client
            .create_api_key(&CreateAPIKeyRequest {
                name: "ci".to_string(),
                permissions: vec!["read".to_string()],
                ..CreateAPIKeyRequest::default()
            })
            .await?;

        assert_eq!(key.key, "rfs_full_secret");
        assert!(key.is_active);
        Ok(())
    }

    #[tokio::test]
    async fn api_keys_lists_masked_keys() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/auth/api-keys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([key_json("rfs_…")])))
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri())?;
        let keys = client.api_keys().await?;

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].id, "key-1");
        Ok(())
    }

    #[tokio::test]
    async fn revoke_api_key_sends_delete() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/auth/api-keys/key-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri())?;
        client.revoke_api_key("key-1").await?;
        Ok(())
    }

    #[tokio::test]
    async fn revoke_api_key_errors_on_not_found() -> anyhow::Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/auth/api-keys/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = AuthClient::new(&server.uri())?;
        let err = client
            .revoke_api_key("missing")
            .await
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected error"))?;

        assert_eq!(err.kind(), AuthErrorKind::RevokeApiKeyFailed);
        assert_eq!(err.to_string(), "Failed to revoke API key: Not Found");
        Ok(())
    }
}
