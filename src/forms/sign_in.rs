use super::{valid_email, FormError, Submitted, INVALID_EMAIL, PASSWORD_REQUIRED, SUBMIT_IN_PROGRESS};
use crate::{client::types::User, error::AuthError, session::SessionHandle};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const DEFAULT_REDIRECT: &str = "/home";
pub const SIGN_UP_PATH: &str = "/register";

/// Values captured by `SignInForm::begin`.
#[derive(Clone, Debug)]
pub struct SignInRequest {
    pub email: String,
    pub password: SecretString,
}

#[derive(Clone, Debug)]
pub struct SignInForm {
    pub email: String,
    pub password: SecretString,
    redirect_to: String,
    loading: bool,
    error: Option<String>,
}

impl Default for SignInForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: SecretString::default(),
            redirect_to: DEFAULT_REDIRECT.to_string(),
            loading: false,
            error: None,
        }
    }
}

impl SignInForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_redirect(mut self, redirect_to: impl Into<String>) -> Self {
        self.redirect_to = redirect_to.into();
        self
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = SecretString::from(password.into());
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn is_submit_disabled(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }

    /// Target of the "create one here" link.
    #[must_use]
    pub const fn sign_up_link() -> &'static str {
        SIGN_UP_PATH
    }

    /// Validate the fields and mark the form as loading.
    ///
    /// # Errors
    /// Returns `FormError::Invalid` for a malformed email, an empty password, or
    /// when a submission is already in flight.
    pub fn begin(&mut self) -> Result<SignInRequest, FormError> {
        if self.loading {
            return Err(FormError::Invalid(SUBMIT_IN_PROGRESS));
        }

        self.error = None;

        let email = self.email.trim().to_string();

        if !valid_email(&email) {
            return Err(self.invalid(INVALID_EMAIL));
        }

        if self.password.expose_secret().is_empty() {
            return Err(self.invalid(PASSWORD_REQUIRED));
        }

        self.loading = true;

        Ok(SignInRequest {
            email,
            password: self.password.clone(),
        })
    }

    /// Apply the login outcome and clear the loading flag.
    ///
    /// # Errors
    /// Returns `FormError::Failed` with "Invalid email or password" for any login failure.
    pub fn finish(&mut self, result: Result<User, AuthError>) -> Result<Submitted, FormError> {
        self.loading = false;

        match result {
            Ok(user) => Ok(Submitted {
                user,
                redirect_to: self.redirect_to.clone(),
            }),
            Err(source) => {
                debug!("sign-in failed: {}", source);
                self.error = Some(INVALID_CREDENTIALS.to_string());

                Err(FormError::Failed {
                    message: INVALID_CREDENTIALS,
                    source,
                })
            }
        }
    }

    /// Validate, sign in through the session, and apply the outcome.
    ///
    /// # Errors
    /// Returns `FormError::Invalid` for local validation failures and
    /// `FormError::Failed` when the login fails.
    pub async fn submit(&mut self, session: &SessionHandle) -> Result<Submitted, FormError> {
        let request = self.begin()?;
        let result = session
            .login(&request.email, request.password.expose_secret())
            .await;

        self.finish(result)
    }

    fn invalid(&mut self, message: &'static str) -> FormError {
        self.error = Some(message.to_string());
        FormError::Invalid(message)
    }
}
