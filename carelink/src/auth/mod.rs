//! Authentication module: sign-in, email verification, and session state.
//!
//! The [`AuthGateway`] is the only writer of the session store. It drives a
//! three-state machine:
//!
//! - **Anonymous**: no token, no pending verification.
//! - **PendingVerification**: the backend accepted the credentials but the
//!   account's email is unverified; only a verification code (or logout)
//!   leaves this state.
//! - **Authenticated**: a non-empty token plus a verified identity.
//!
//! A session and a pending verification are mutually exclusive: committing
//! a session clears the pending marker, and marking verification pending
//! never commits a session.
//!
//! Remote operations run through the [`AuthBackend`] trait, with two
//! implementations: [`RemoteBackend`] (REST over HTTP) and [`MockBackend`]
//! (an in-memory user table for demos and tests). All failures — bad
//! credentials, unreachable server, malformed responses — are caught at the
//! gateway boundary and reported as `false`; nothing above it panics or
//! sees an error type.
//!
//! ## Example
//!
//! ```
//! use carelink::{AuthGateway, AuthState, SessionStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut gateway = AuthGateway::mock(SessionStore::in_memory());
//! assert_eq!(gateway.state(), AuthState::Anonymous);
//!
//! gateway.sign_in("driver@hospital.com", "password123", "ambulance_driver").await;
//! assert_eq!(gateway.state(), AuthState::PendingVerification);
//!
//! gateway.logout();
//! assert_eq!(gateway.state(), AuthState::Anonymous);
//! # }
//! ```

pub mod backend;
pub mod errors;
pub mod gateway;
pub mod mock;
pub mod models;
pub mod remote;

pub use backend::AuthBackend;
pub use errors::{AuthError, AuthResult};
pub use gateway::AuthGateway;
pub use mock::{MockBackend, MockUser};
pub use models::{AuthState, Identity, Role, SignInOutcome, UnknownRoleError};
pub use remote::RemoteBackend;
