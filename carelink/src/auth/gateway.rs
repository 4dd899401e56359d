//! The auth gateway state machine.

use super::backend::AuthBackend;
use super::errors::{AuthError, AuthResult};
use super::mock::MockBackend;
use super::models::{AuthState, Identity, SignInOutcome};
use super::remote::RemoteBackend;
use crate::session::SessionStore;
use log::{info, warn};

/// Snapshot held between an accepted-but-unverified sign-in and a
/// successful verification. Never exposed outside the gateway; the session
/// store only ever sees the marker email.
struct PendingVerification {
    email: String,
    identity: Identity,
    token: String,
}

/// Orchestrates sign-in, email verification, and logout against an
/// [`AuthBackend`], and is the sole writer of its [`SessionStore`].
///
/// Every public operation resolves to a boolean: `true` when it left the
/// caller fully authenticated (or, for resend, when the backend accepted
/// the request), `false` for everything else. Credential rejections,
/// transport failures, and malformed responses are all logged here and
/// normalized to `false`; callers distinguish "wrong password" from
/// "verification required" by inspecting [`state`](Self::state).
///
/// Operations take `&mut self`, so overlapping calls on one gateway are
/// ruled out by borrowing; nothing guards two gateways sharing one storage
/// directory.
pub struct AuthGateway {
    backend: Box<dyn AuthBackend>,
    store: SessionStore,
    pending: Option<PendingVerification>,
    last_error: Option<String>,
}

impl AuthGateway {
    /// Gateway over an arbitrary backend. Restores any persisted session
    /// before returning.
    pub fn new(backend: Box<dyn AuthBackend>, mut store: SessionStore) -> Self {
        store.restore();
        Self {
            backend,
            store,
            pending: None,
            last_error: None,
        }
    }

    /// Gateway talking to the REST service at `base_url`.
    pub fn remote(base_url: impl Into<String>, store: SessionStore) -> Self {
        Self::new(Box::new(RemoteBackend::new(base_url)), store)
    }

    /// Gateway over the seeded in-memory demo table.
    pub fn mock(store: SessionStore) -> Self {
        Self::new(Box::new(MockBackend::new()), store)
    }

    /// Current state of the session machine.
    pub fn state(&self) -> AuthState {
        if self.store.is_authenticated() {
            AuthState::Authenticated
        } else if self.pending.is_some() || self.store.pending_email().is_some() {
            AuthState::PendingVerification
        } else {
            AuthState::Anonymous
        }
    }

    /// Read access to the session store, for the role router and for
    /// attaching the bearer token to data requests.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Display message from the most recent failed operation, suitable for
    /// the sign-in form. Cleared by the next successful operation.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Sign in with the given credentials and role string.
    ///
    /// Returns `true` only when the caller ends up fully authenticated.
    /// `false` covers bad credentials, transport failures, *and* accounts
    /// that still need email verification; check [`state`](Self::state)
    /// for the latter. An accepted sign-in replaces whatever session or
    /// pending verification came before it; a rejected one changes nothing.
    pub async fn sign_in(&mut self, email: &str, password: &str, role: &str) -> bool {
        match self.try_sign_in(email, password, role).await {
            Ok(authenticated) => {
                self.last_error = None;
                authenticated
            }
            Err(e) => {
                warn!("sign-in failed for '{email}': {e}");
                self.last_error = Some(e.client_message());
                false
            }
        }
    }

    async fn try_sign_in(&mut self, email: &str, password: &str, role: &str) -> AuthResult<bool> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() || role.trim().is_empty() {
            return Err(AuthError::MissingInput);
        }
        let role = role.parse()?;

        let SignInOutcome { identity, token } =
            self.backend.sign_in(email, password, role).await?;

        if !identity.email_verified {
            // The backend accepted the sign-in, so any earlier session is
            // superseded; a committed session and a pending marker must
            // never coexist in the slots.
            self.pending = None;
            self.store.clear();
            self.store.set_pending_email(email)?;
            self.pending = Some(PendingVerification {
                email: email.to_string(),
                identity,
                token,
            });
            info!("sign-in accepted for '{email}', awaiting email verification");
            return Ok(false);
        }

        self.pending = None;
        self.store.commit(identity, token)?;
        info!("signed in as '{email}' ({role})");
        Ok(true)
    }

    /// Submit an email verification code.
    ///
    /// Fails deterministically, without a network call, unless a
    /// verification is pending. On success the pending identity is
    /// committed with its verified flag set and the marker is cleared.
    /// When no session token was held for the pending sign-in (a restart
    /// mid-gate, or a backend that issues tokens only to verified
    /// accounts), verification still reports `true` but the machine
    /// returns to anonymous and the caller must sign in again.
    pub async fn verify_email(&mut self, code: &str) -> bool {
        match self.try_verify_email(code).await {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                warn!("email verification failed: {e}");
                self.last_error = Some(e.client_message());
                false
            }
        }
    }

    async fn try_verify_email(&mut self, code: &str) -> AuthResult<()> {
        if self.state() != AuthState::PendingVerification {
            return Err(AuthError::NoPendingVerification);
        }

        self.backend.verify_email(code).await?;

        match self.pending.take() {
            Some(PendingVerification {
                email,
                mut identity,
                token,
            }) if !token.is_empty() => {
                identity.email_verified = true;
                self.store.commit(identity, token)?;
                info!("email verified for '{email}'");
            }
            Some(PendingVerification { email, .. }) => {
                // Sign-in never issued a token, so there is no session to
                // commit. The account is verified server-side; the next
                // sign-in starts a real session.
                self.store.clear_pending_email();
                info!("email verified for '{email}'; sign in again to start a session");
            }
            None => {
                // The marker outlived its snapshot (restart mid-gate).
                // Verification succeeded server-side, so the next sign-in
                // comes back already verified.
                self.store.clear_pending_email();
            }
        }
        Ok(())
    }

    /// Ask the backend to resend the verification code.
    ///
    /// Requires a pending verification whose email matches (an empty
    /// `email` falls back to the pending one). Reports backend success and
    /// never changes local state.
    pub async fn resend_verification(&mut self, email: &str) -> bool {
        match self.try_resend_verification(email).await {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(e) => {
                warn!("resend verification failed: {e}");
                self.last_error = Some(e.client_message());
                false
            }
        }
    }

    async fn try_resend_verification(&mut self, email: &str) -> AuthResult<()> {
        let pending_email = self
            .pending
            .as_ref()
            .map(|p| p.email.clone())
            .or_else(|| self.store.pending_email().map(str::to_string))
            .ok_or(AuthError::NoPendingVerification)?;

        let email = email.trim();
        if !email.is_empty() && !email.eq_ignore_ascii_case(&pending_email) {
            return Err(AuthError::EmailMismatch);
        }

        self.backend.resend_verification(&pending_email).await
    }

    /// Terminate the session unconditionally.
    ///
    /// Purely local and synchronous: a session must always be terminable
    /// even when the remote service is unreachable.
    pub fn logout(&mut self) {
        self.pending = None;
        self.last_error = None;
        self.store.clear();
        info!("signed out");
    }
}
