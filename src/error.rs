use std::fmt;
use thiserror::Error;

/// Remote operation an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    Logout,
    CurrentUser,
    Refresh,
    CreateApiKey,
    ListApiKeys,
    RevokeApiKey,
}

impl Operation {
    /// User-facing prefix for failures of this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
            Self::Logout => "Logout failed",
            Self::CurrentUser => "Failed to get current user",
            Self::Refresh => "Session refresh failed",
            Self::CreateApiKey => "Failed to create API key",
            Self::ListApiKeys => "Failed to fetch API keys",
            Self::RevokeApiKey => "Failed to revoke API key",
        }
    }

    #[must_use]
    pub const fn kind(self) -> AuthErrorKind {
        match self {
            Self::Login => AuthErrorKind::LoginFailed,
            Self::Register => AuthErrorKind::RegisterFailed,
            Self::Logout => AuthErrorKind::LogoutFailed,
            Self::CurrentUser => AuthErrorKind::NotAuthenticated,
            Self::Refresh => AuthErrorKind::RefreshFailed,
            Self::CreateApiKey => AuthErrorKind::CreateApiKeyFailed,
            Self::ListApiKeys => AuthErrorKind::ListApiKeysFailed,
            Self::RevokeApiKey => AuthErrorKind::RevokeApiKeyFailed,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Logout => "logout",
            Self::CurrentUser => "current_user",
            Self::Refresh => "refresh",
            Self::CreateApiKey => "create_api_key",
            Self::ListApiKeys => "list_api_keys",
            Self::RevokeApiKey => "revoke_api_key",
        };
        formatter.write_str(name)
    }
}

/// Coarse classification callers match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    LoginFailed,
    RegisterFailed,
    LogoutFailed,
    NotAuthenticated,
    RefreshFailed,
    CreateApiKeyFailed,
    ListApiKeysFailed,
    RevokeApiKeyFailed,
    Usage,
    Config,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// The server answered with a non-success status.
    #[error("{}: {status_text}", .operation.failure_message())]
    Status {
        operation: Operation,
        status: u16,
        status_text: String,
    },

    /// The server answered 2xx but reported `success: false`.
    #[error("{message}")]
    Rejected {
        operation: Operation,
        message: String,
    },

    #[error("{}: {source}", .operation.failure_message())]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{}: invalid response body: {source}", .operation.failure_message())]
    Decode {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Usage(&'static str),

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl AuthError {
    #[must_use]
    pub const fn kind(&self) -> AuthErrorKind {
        match self {
            Self::Status { operation, .. }
            | Self::Rejected { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. } => operation.kind(),
            Self::Usage(_) => AuthErrorKind::Usage,
            Self::InvalidBaseUrl { .. } | Self::HttpClient(_) => AuthErrorKind::Config,
        }
    }

    /// Operation that failed, when the error came from a remote call.
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Status { operation, .. }
            | Self::Rejected { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
            Self::Usage(_) | Self::InvalidBaseUrl { .. } | Self::HttpClient(_) => None,
        }
    }

    /// HTTP status, when the server answered with one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn rejected(operation: Operation, message: Option<String>) -> Self {
        let message = message
            .map(|message| message.trim().to_string())
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| operation.failure_message().to_string());
        Self::Rejected { operation, message }
    }
}
