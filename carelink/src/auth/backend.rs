//! The backend contract behind the auth gateway.

use super::errors::AuthResult;
use super::models::{Role, SignInOutcome};
use async_trait::async_trait;

/// The three remote operations the gateway depends on.
///
/// Two implementations exist behind this one contract:
/// [`RemoteBackend`](super::RemoteBackend) talks REST to the real service,
/// [`MockBackend`](super::MockBackend) serves a seeded in-memory user
/// table. The gateway is written against the trait, so either can back it.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for an identity and token.
    ///
    /// An `Ok` outcome with `email_verified = false` means the credentials
    /// were accepted but the account still needs its email confirmed; the
    /// gateway will hold the outcome as a pending snapshot instead of
    /// committing it.
    async fn sign_in(&self, email: &str, password: &str, role: Role) -> AuthResult<SignInOutcome>;

    /// Submit a verification code for the account that just signed in.
    async fn verify_email(&self, code: &str) -> AuthResult<()>;

    /// Ask the backend to send a fresh verification code.
    async fn resend_verification(&self, email: &str) -> AuthResult<()>;
}
