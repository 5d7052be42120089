use super::{valid_email, FormError, Submitted, INVALID_EMAIL, PASSWORD_REQUIRED, SUBMIT_IN_PROGRESS};
use crate::{client::types::User, error::AuthError, session::SessionHandle};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const DEFAULT_REDIRECT: &str = "/login";
pub const SIGN_IN_PATH: &str = "/login";
pub const TERMS_PATH: &str = "/pages/terms";
pub const PRIVACY_PATH: &str = "/pages/privacy";

/// Values captured by `SignUpForm::begin`.
#[derive(Clone, Debug)]
pub struct SignUpRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: SecretString,
}

#[derive(Clone, Debug)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    redirect_to: String,
    show_confirm_password: bool,
    show_terms_acceptance: bool,
    loading: bool,
    error: Option<String>,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: SecretString::default(),
            confirm_password: SecretString::default(),
            redirect_to: DEFAULT_REDIRECT.to_string(),
            show_confirm_password: true,
            show_terms_acceptance: true,
            loading: false,
            error: None,
        }
    }
}

impl SignUpForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_redirect(mut self, redirect_to: impl Into<String>) -> Self {
        self.redirect_to = redirect_to.into();
        self
    }

    /// Whether the confirmation field is shown and checked.
    #[must_use]
    pub const fn with_confirm_password(mut self, show: bool) -> Self {
        self.show_confirm_password = show;
        self
    }

    #[must_use]
    pub const fn with_terms_acceptance(mut self, show: bool) -> Self {
        self.show_terms_acceptance = show;
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = SecretString::from(password.into());
    }

    pub fn set_confirm_password(&mut self, password: impl Into<String>) {
        self.confirm_password = SecretString::from(password.into());
    }

    #[must_use]
    pub const fn shows_confirm_password(&self) -> bool {
        self.show_confirm_password
    }

    #[must_use]
    pub const fn shows_terms_acceptance(&self) -> bool {
        self.show_terms_acceptance
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

    #[must_use]
    pub const fn sign_in_link() -> &'static str {
        SIGN_IN_PATH
    }

    #[must_use]
    pub const fn terms_link() -> &'static str {
        TERMS_PATH
    }

    #[must_use]
    pub const fn privacy_link() -> &'static str {
        PRIVACY_PATH
    }

    /// Validate the fields and mark the form as loading.
    ///
    /// # Errors
    /// Returns `FormError::Invalid` when the passwords differ (with confirmation
    /// shown), the email is malformed, the password is empty, or a submission is
    /// already in flight.
    pub fn begin(&mut self) -> Result<SignUpRequest, FormError> {
        if self.loading {
            return Err(FormError::Invalid(SUBMIT_IN_PROGRESS));
        }

        self.error = None;

        if self.show_confirm_password
            && self.password.expose_secret() != self.confirm_password.expose_secret()
        {
            return Err(self.invalid(PASSWORDS_DO_NOT_MATCH));
        }

        let email = self.email.trim().to_string();

        if !valid_email(&email) {
            return Err(self.invalid(INVALID_EMAIL));
        }

        if self.password.expose_secret().is_empty() {
            return Err(self.invalid(PASSWORD_REQUIRED));
        }

        let name = Some(self.name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        self.loading = true;

        Ok(SignUpRequest {
            name,
            email,
            password: self.password.clone(),
        })
    }

    /// Apply the registration outcome and clear the loading flag.
    ///
    /// # Errors
    /// Returns `FormError::Failed` with a generic retry message for any failure.
    pub fn finish(&mut self, result: Result<User, AuthError>) -> Result<Submitted, FormError> {
        self.loading = false;

        match result {
            Ok(user) => Ok(Submitted {
                user,
                redirect_to: self.redirect_to.clone(),
            }),
            Err(source) => {
                debug!("sign-up failed: {}", source);
                self.error = Some(REGISTRATION_FAILED.to_string());

                Err(FormError::Failed {
                    message: REGISTRATION_FAILED,
                    source,
                })
            }
        }
    }

    /// Validate, register through the session, and apply the outcome.
    ///
    /// # Errors
    /// Returns `FormError::Invalid` for local validation failures and
    /// `FormError::Failed` when the registration fails.
    pub async fn submit(&mut self, session: &SessionHandle) -> Result<Submitted, FormError> {
        let request = self.begin()?;
        let result = session
            .register(
                &request.email,
                request.password.expose_secret(),
                request.name.as_deref(),
            )
            .await;

        self.finish(result)
    }

    fn invalid(&mut self, message: &'static str) -> FormError {
        self.error = Some(message.to_string());
        FormError::Invalid(message)
    }
}
