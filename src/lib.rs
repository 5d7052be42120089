//! # robosystems-auth
//!
//! Client-side authentication for the RoboSystems API: a cookie-session HTTP
//! client, a session provider that tracks who is signed in, and headless
//! sign-in / sign-up form controllers.
//!
//! ## Session lifecycle
//!
//! 1. **Check:** creating a [`SessionProvider`] spawns a `GET /v1/auth/me`. A
//!    returned user makes the session *Authenticated*; any failure makes it
//!    *Anonymous*. Either way `is_loading` clears.
//! 2. **Login / register:** a successful response replaces the user; failures
//!    are returned to the caller and leave the state untouched.
//! 3. **Refresh:** while authenticated, a background task calls
//!    `POST /v1/auth/refresh` every ten minutes. A failed refresh logs the
//!    session out once.
//! 4. **Logout:** the remote call is best effort; the local session is always
//!    cleared.
//!
//! The server identifies the caller through its session cookie. The client keeps
//! cookies in memory only, so a session lives as long as the [`AuthClient`] that
//! received it. Passwords and API-key secrets must never be logged.

pub mod cli;
pub mod client;
pub mod error;
pub mod forms;
pub mod session;

pub use client::{
    types::{APIKey, AuthResponse, CreateAPIKeyRequest, User},
    AuthClient, ClientConfig,
};
pub use error::{AuthError, AuthErrorKind, Operation};
pub use forms::{SignInForm, SignUpForm};
pub use session::{Session, SessionConfig, SessionHandle, SessionProvider, SessionStatus};

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
