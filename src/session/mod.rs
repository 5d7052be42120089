//! Session state and lifecycle. The provider checks the session once on
//! creation, applies the result of login, register, refresh and logout, and runs
//! a background refresh task only while a user is signed in. Consumers get a
//! `SessionHandle` passed to them explicitly; a handle that outlives its provider
//! fails with `AuthError::Usage` instead of returning an empty session.

mod refresh;

pub use refresh::MAX_REFRESH_INTERVAL;

use crate::{
    client::{
        types::{APIKey, CreateAPIKeyRequest, User},
        AuthClient,
    },
    error::AuthError,
};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

/// Default interval between background refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

const PROVIDER_GONE: &str = "session accessed outside an active session provider";

/// Snapshot of the client-observed session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub is_loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Anonymous,
    Authenticated,
}

impl Session {
    const fn initializing() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        if self.user.is_some() {
            SessionStatus::Authenticated
        } else if self.is_loading {
            SessionStatus::Initializing
        } else {
            SessionStatus::Anonymous
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub refresh_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

#[derive(Debug)]
struct Inner {
    client: AuthClient,
    config: SessionConfig,
    state: watch::Sender<Session>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl Inner {
    fn refresh_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.refresh_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Mount-time check. Only applied while still initializing, so an explicit
    /// login or register that resolved first is not overwritten.
    async fn check_session(self: &Arc<Self>) {
        let user = match self.client.current_user().await {
            Ok(user) => Some(user),
            Err(err) => {
                debug!("no active session: {}", err);
                None
            }
        };

        let applied = self.state.send_if_modified(|session| {
            if !session.is_loading {
                return false;
            }
            session.user = user;
            session.is_loading = false;
            true
        });

        if applied {
            self.sync_refresh();
        }
    }

    fn set_user(self: &Arc<Self>, user: Option<User>) {
        self.state.send_modify(|session| {
            session.user = user;
            session.is_loading = false;
        });

        self.sync_refresh();
    }

    /// Arm the refresh task when authenticated, abort it otherwise.
    fn sync_refresh(self: &Arc<Self>) {
        let mut slot = self.refresh_slot();
        let authenticated = self.state.borrow().is_authenticated();

        if authenticated {
            if slot.as_ref().map_or(true, JoinHandle::is_finished) {
                debug!(
                    "arming session refresh every {} seconds",
                    self.config.refresh_interval.as_secs()
                );
                *slot = Some(refresh::spawn(
                    Arc::downgrade(self),
                    self.config.refresh_interval,
                ));
            }
        } else if let Some(task) = slot.take() {
            debug!("disarming session refresh");
            task.abort();
        }
    }

    async fn login(self: &Arc<Self>, email: &str, password: &str) -> Result<User, AuthError> {
        let response = self.client.login(email, password).await?;
        info!("signed in as user {}", response.user.id);
        self.set_user(Some(response.user.clone()));

        Ok(response.user)
    }

    async fn register(
        self: &Arc<Self>,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<User, AuthError> {
        let response = self.client.register(email, password, name).await?;
        info!("registered user {}", response.user.id);
        self.set_user(Some(response.user.clone()));

        Ok(response.user)
    }

    async fn logout(self: &Arc<Self>) {
        if let Err(err) = self.client.logout().await {
            warn!("Logout error: {}", err);
        }

        self.set_user(None);
    }

    async fn refresh_session(self: &Arc<Self>) -> Result<User, AuthError> {
        let response = self.client.refresh_session().await?;
        self.set_user(Some(response.user.clone()));

        Ok(response.user)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(task) = self.refresh_slot().take() {
            task.abort();
        }
    }
}

/// Owner of the session state. Dropping it stops the background refresh and
/// invalidates every `SessionHandle` it gave out.
#[derive(Debug)]
pub struct SessionProvider {
    inner: Arc<Inner>,
    check_task: JoinHandle<()>,
}

impl SessionProvider {
    /// Create the provider and start the mount-time session check.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn new(client: AuthClient, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(Session::initializing());

        let inner = Arc::new(Inner {
            client,
            config,
            state,
            refresh_task: Mutex::new(None),
        });

        let check_task = tokio::spawn({
            let inner = Arc::clone(&inner);
            async move { inner.check_session().await }
        });

        Self { inner, check_task }
    }

    /// Handle for consumers; pass it explicitly to whatever needs the session.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.session()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Wait for the mount-time check to resolve.
    pub async fn ready(&self) -> Session {
        let mut receiver = self.subscribe();
        let ready = receiver
            .wait_for(|session| !session.is_loading)
            .await
            .map(|session| session.clone());

        ready.unwrap_or_else(|_| self.session())
    }

    /// See [`SessionHandle::login`].
    ///
    /// # Errors
    /// Returns the client error when the login is rejected.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.inner.login(email, password).await
    }

    /// See [`SessionHandle::register`].
    ///
    /// # Errors
    /// Returns the client error when the registration is rejected.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<User, AuthError> {
        self.inner.register(email, password, name).await
    }

    pub async fn logout(&self) {
        self.inner.logout().await;
    }

    /// See [`SessionHandle::refresh_session`].
    ///
    /// # Errors
    /// Returns the client error when the refresh fails.
    pub async fn refresh_session(&self) -> Result<User, AuthError> {
        self.inner.refresh_session().await
    }
}

impl Drop for SessionProvider {
    fn drop(&mut self) {
        self.check_task.abort();

        if let Some(task) = self.inner.refresh_slot().take() {
            task.abort();
        }
    }
}

/// Non-owning access to a provider's session.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle {
    inner: Weak<Inner>,
}

impl SessionHandle {
    fn inner(&self) -> Result<Arc<Inner>, AuthError> {
        self.inner.upgrade().ok_or(AuthError::Usage(PROVIDER_GONE))
    }

    /// Current session snapshot.
    ///
    /// # Errors
    /// Returns `AuthError::Usage` if the provider is gone.
    pub fn session(&self) -> Result<Session, AuthError> {
        Ok(self.inner()?.session())
    }

    /// # Errors
    /// Returns `AuthError::Usage` if the provider is gone.
    pub fn subscribe(&self) -> Result<watch::Receiver<Session>, AuthError> {
        Ok(self.inner()?.state.subscribe())
    }

    /// Wait for the mount-time check to resolve.
    ///
    /// # Errors
    /// Returns `AuthError::Usage` if the provider is gone or goes away while waiting.
    pub async fn ready(&self) -> Result<Session, AuthError> {
        let mut receiver = self.subscribe()?;

        receiver
            .wait_for(|session| !session.is_loading)
            .await
            .map(|session| session.clone())
            .map_err(|_| AuthError::Usage(PROVIDER_GONE))
    }

    /// Sign in. On success the session becomes authenticated with the returned
    /// user; on failure the session is left as it was.
    ///
    /// # Errors
    /// Returns the client error (`LoginFailed`) or `AuthError::Usage`.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.inner()?.login(email, password).await
    }

    /// Register and sign in, with the same state rules as [`Self::login`].
    ///
    /// # Errors
    /// Returns the client error (`RegisterFailed`) or `AuthError::Usage`.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<User, AuthError> {
        self.inner()?.register(email, password, name).await
    }

    /// Clear the session. Remote failures are logged and never returned.
    ///
    /// # Errors
    /// Returns `AuthError::Usage` if the provider is gone.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.inner()?.logout().await;
        Ok(())
    }

    /// Refresh now. Unlike the background refresh, a failure here is returned
    /// to the caller and does not log the session out.
    ///
    /// # Errors
    /// Returns the client error (`RefreshFailed`) or `AuthError::Usage`.
    pub async fn refresh_session(&self) -> Result<User, AuthError> {
        self.inner()?.refresh_session().await
    }

    /// # Errors
    /// Returns the client error (`CreateApiKeyFailed`) or `AuthError::Usage`.
    pub async fn create_api_key(&self, request: &CreateAPIKeyRequest) -> Result<APIKey, AuthError> {
        self.inner()?.client.create_api_key(request).await
    }

    /// # Errors
    /// Returns the client error (`ListApiKeysFailed`) or `AuthError::Usage`.
    pub async fn api_keys(&self) -> Result<Vec<APIKey>, AuthError> {
        self.inner()?.client.api_keys().await
    }

    /// # Errors
    /// Returns the client error (`RevokeApiKeyFailed`) or `AuthError::Usage`.
    pub async fn revoke_api_key(&self, id: &str) -> Result<(), AuthError> {
        self.inner()?.client.revoke_api_key(id).await
    }
}
