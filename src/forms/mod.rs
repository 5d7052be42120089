//! Headless sign-in and sign-up form controllers. They hold field values,
//! loading and error state, validate input locally, and call the session
//! through an explicitly passed `SessionHandle`. Rendering is left to the
//! caller; the `loading` flag is what a UI uses to disable the submit control.
//!
//! A submission is split in two so a UI can release its lock on the form while
//! the request is in flight: `begin` validates and marks the form as loading,
//! `finish` applies the outcome. `submit` runs both around the session call.

mod sign_in;
mod sign_up;

pub use sign_in::{SignInForm, SignInRequest};
pub use sign_up::{SignUpForm, SignUpRequest};

use crate::{client::types::User, error::AuthError};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const PASSWORD_REQUIRED: &str = "Please enter your password";
pub const SUBMIT_IN_PROGRESS: &str = "A submission is already in progress";

#[derive(Debug, Error)]
pub enum FormError {
    /// Rejected locally, nothing was sent.
    #[error("{0}")]
    Invalid(&'static str),

    /// The auth call failed; `message` is what the form displays.
    #[error("{message}")]
    Failed {
        message: &'static str,
        #[source]
        source: AuthError,
    },
}

/// Successful submission: the signed-in user and where to send them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submitted {
    pub user: User,
    pub redirect_to: String,
}

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

pub fn valid_email(email: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(email))
}
