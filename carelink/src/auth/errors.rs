//! Authentication error types.

use crate::session::StorageError;
use thiserror::Error;

/// Authentication errors.
///
/// These never cross the gateway boundary: every public gateway operation
/// catches them, logs the concrete kind, and reports plain `false`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email, password, or role was empty
    #[error("Email, password, and role are all required")]
    MissingInput,

    /// Role string not one of the recognized values
    #[error(transparent)]
    UnknownRole(#[from] crate::auth::models::UnknownRoleError),

    /// Sign-in rejected by the backend
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    /// Verification code rejected by the backend
    #[error("Invalid verification code: {0}")]
    Verification(String),

    /// Operation requires a verification to be in flight
    #[error("No verification is pending")]
    NoPendingVerification,

    /// Resend requested for an email other than the pending one
    #[error("Email does not match the pending verification")]
    EmailMismatch,

    /// Backend rejected a request outside the credential/verification paths
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Network-level failure (name resolution, refused connection, timeout)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response did not match the declared contract
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Persisting session material failed
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Message safe to show on the sign-in form.
    ///
    /// Transport and parse failures are collapsed into the same generic
    /// message as a credential rejection so the form never leaks whether
    /// the server was reachable.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Credentials(_) => "Invalid credentials".to_string(),
            AuthError::Verification(_) => "Invalid verification code".to_string(),
            AuthError::Transport(_) | AuthError::MalformedResponse(_) => {
                "Network error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
