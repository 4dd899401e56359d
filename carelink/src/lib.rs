//! # CareLink
//!
//! Client-side core for a hospital network dispatch console: who is signed
//! in, whether their email has been verified, and which dashboard their role
//! is allowed to open.
//!
//! The backend (ambulance fleets, bed inventory, staff rosters) is an
//! external REST service; this crate owns the three pieces the console
//! cannot get wrong:
//!
//! - [`session`]: the session store, the single source of truth for the
//!   current identity and bearer token, persisted synchronously so a
//!   restart reproduces exactly what was last observed.
//! - [`auth`]: the auth gateway, a three-state machine (anonymous, pending
//!   email verification, authenticated) driven by sign-in, verify, resend,
//!   and logout. Failures never escape its surface.
//! - [`routing`]: the role router, a pure total mapping from session state
//!   and role allow-lists to exactly one navigation outcome.
//!
//! ## Example
//!
//! ```
//! use carelink::{AuthGateway, SessionStore, routing};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut gateway = AuthGateway::mock(SessionStore::in_memory());
//!
//! // The seeded demo accounts all require email verification first.
//! assert!(!gateway.sign_in("admin@hospital.com", "password123", "hospital_admin").await);
//! assert!(gateway.verify_email("123456").await);
//! assert_eq!(routing::default_view(gateway.store()), routing::View::AdminDashboard);
//! # }
//! ```

/// Sign-in, email verification, and the session state machine.
pub mod auth;
pub use auth::{
    AuthBackend, AuthError, AuthGateway, AuthState, Identity, MockBackend, MockUser,
    RemoteBackend, Role,
};

/// Durable session storage.
pub mod session;
pub use session::{FileSlots, MemorySlots, SessionSlots, SessionStore, Slot};

/// Role-gated navigation.
pub mod routing;
pub use routing::{RouteOutcome, View};
