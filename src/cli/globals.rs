use crate::{
    client::{AuthClient, ClientConfig},
    error::AuthError,
};
use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection and credential arguments shared by every subcommand.
#[derive(Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            email: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn set_credentials(&mut self, email: Option<String>, password: Option<SecretString>) {
        self.email = email;
        self.password = password;
    }

    /// Build the HTTP client for this invocation.
    ///
    /// # Errors
    /// Returns an error if the API URL is invalid or the HTTP client cannot be built.
    pub fn client(&self) -> Result<AuthClient, AuthError> {
        AuthClient::with_config(ClientConfig::new(&self.api_url).with_timeout(self.timeout))
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("api_url", &self.api_url)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
