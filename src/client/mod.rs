//! HTTP client for the auth API. Every request goes through one shared
//! `reqwest::Client` with an in-memory cookie store, so the session cookie set
//! by login or register is sent on every later call. Calls are single best-effort
//! round trips: no retries and no caching.

pub mod api_keys;
pub mod types;

use crate::{
    error::{AuthError, Operation},
    APP_USER_AGENT,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info_span, Instrument};
use types::{
    AuthEnvelope, AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest, User,
};
use url::Url;

const LOGIN_PATH: &str = "/v1/auth/login";
const REGISTER_PATH: &str = "/v1/auth/register";
const LOGOUT_PATH: &str = "/v1/auth/logout";
const ME_PATH: &str = "/v1/auth/me";
const REFRESH_PATH: &str = "/v1/auth/refresh";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout; `None` waits as long as the transport does.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            user_agent: APP_USER_AGENT.to_string(),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Cookie-session client for the auth API. Cheap to clone; clones share the
/// connection pool and the cookie jar.
#[derive(Clone, Debug)]
pub struct AuthClient {
    http: Client,
    base_url: String,
}

impl AuthClient {
    /// Build a client with default settings.
    ///
    /// # Errors
    /// Returns `AuthError::InvalidBaseUrl` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, AuthError> {
        Self::with_config(ClientConfig::new(base_url))
    }

    /// Build a client from an explicit configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self, AuthError> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut builder = Client::builder()
            .user_agent(config.user_agent)
            .cookie_store(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(AuthError::HttpClient)?;

        debug!("auth client base URL: {}", base_url);

        Ok(Self { http, base_url })
    }

    /// Normalized base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    /// Returns a `LoginFailed` error on a non-success status, a network failure,
    /// or a response with `success: false`.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let request = self
            .request(Method::POST, LOGIN_PATH)
            .json(&LoginRequest { email, password });

        let response = self.send(Operation::Login, request).await?;
        let envelope: AuthEnvelope = decode(Operation::Login, response).await?;

        into_auth_response(Operation::Login, envelope)
    }

    /// Create an account; on success the server also opens a session.
    ///
    /// # Errors
    /// Returns a `RegisterFailed` error on a non-success status, a network failure,
    /// or a response with `success: false`.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthResponse, AuthError> {
        let request = self
            .request(Method::POST, REGISTER_PATH)
            .json(&RegisterRequest {
                email,
                password,
                name,
            });

        let response = self.send(Operation::Register, request).await?;
        let envelope: AuthEnvelope = decode(Operation::Register, response).await?;

        into_auth_response(Operation::Register, envelope)
    }

    /// Invalidate the server-side session.
    ///
    /// # Errors
    /// Returns a `LogoutFailed` error on a non-success status or a network failure.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let request = self.request(Method::POST, LOGOUT_PATH);
        self.send(Operation::Logout, request).await?;
        Ok(())
    }

    /// Fetch the user behind the current session cookie.
    ///
    /// # Errors
    /// Returns a `NotAuthenticated` error when there is no valid session, which is
    /// the expected answer for anonymous visitors.
    pub async fn current_user(&self) -> Result<User, AuthError> {
        let request = self.request(Method::GET, ME_PATH);
        let response = self.send(Operation::CurrentUser, request).await?;
        let body: CurrentUserResponse = decode(Operation::CurrentUser, response).await?;

        Ok(body.user)
    }

    /// Extend the current session.
    ///
    /// # Errors
    /// Returns a `RefreshFailed` error on a non-success status, a network failure,
    /// or a response with `success: false`.
    pub async fn refresh_session(&self) -> Result<AuthResponse, AuthError> {
        let request = self.request(Method::POST, REFRESH_PATH);
        let response = self.send(Operation::Refresh, request).await?;
        let envelope: AuthEnvelope = decode(Operation::Refresh, response).await?;

        into_auth_response(Operation::Refresh, envelope)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.endpoint(path))
    }

    /// Send a request and map non-success statuses to `AuthError::Status`.
    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Response, AuthError> {
        let request = request
            .build()
            .map_err(|source| AuthError::Transport { operation, source })?;

        let span = info_span!(
            "auth.request",
            %operation,
            http.method = %request.method(),
            url = %request.url()
        );

        let response = self
            .http
            .execute(request)
            .instrument(span)
            .await
            .map_err(|source| AuthError::Transport { operation, source })?;

        let status = response.status();

        if !status.is_success() {
            debug!("{} returned {}", operation, status);

            return Err(AuthError::Status {
                operation,
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(
    operation: Operation,
    response: Response,
) -> Result<T, AuthError> {
    response
        .json::<T>()
        .await
        .map_err(|source| AuthError::Decode { operation, source })
}

/// Apply the uniform success contract: `success: false` fails like a bad status.
fn into_auth_response(
    operation: Operation,
    envelope: AuthEnvelope,
) -> Result<AuthResponse, AuthError> {
    match envelope {
        AuthEnvelope {
            success: true,
            user: Some(user),
            message,
        } => Ok(AuthResponse {
            user,
            success: true,
            message,
        }),
        AuthEnvelope { message, .. } => Err(AuthError::rejected(operation, message)),
    }
}

/// Validate the base URL once and strip trailing slashes.
fn normalize_base_url(raw: &str) -> Result<String, AuthError> {
    let trimmed = raw.trim();

    let url = Url::parse(trimmed).map_err(|err| AuthError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AuthError::InvalidBaseUrl {
                url: trimmed.to_string(),
                reason: format!("unsupported scheme {scheme}"),
            })
        }
    }

    if url.host().is_none() {
        return Err(AuthError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: "no host specified".to_string(),
        });
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(AuthError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: "query or fragment not allowed".to_string(),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
