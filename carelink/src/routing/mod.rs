//! Role-gated navigation.
//!
//! Maps the current session onto views: dashboards carry a role
//! allow-list, and every possible (authenticated, role) pair resolves to
//! exactly one outcome. Unauthenticated requests for a gated view redirect
//! to sign-in; authenticated requests by a role outside the allow-list
//! redirect to the landing view. There is no partial or error outcome.

use crate::auth::models::Role;
use crate::session::SessionStore;
use std::fmt;

/// A screen the console can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Public entry point for anonymous users.
    Landing,
    /// The sign-in form.
    SignIn,
    /// Ambulance drivers: own vehicle, live location, dispatch state.
    DriverDashboard,
    /// Hospital administrators: fleet, beds, staff, hospital stats.
    AdminDashboard,
    /// Doctors and nurses: bed assignments and work hours.
    ClinicalDashboard,
}

impl View {
    /// Roles allowed to open this view. An empty list means public.
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            View::Landing | View::SignIn => &[],
            View::DriverDashboard => &[Role::AmbulanceDriver],
            View::AdminDashboard => &[Role::HospitalAdmin],
            View::ClinicalDashboard => &[Role::Doctor, Role::Nurse],
        }
    }

    pub fn is_public(self) -> bool {
        self.allowed_roles().is_empty()
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            View::Landing => "landing",
            View::SignIn => "sign-in",
            View::DriverDashboard => "driver dashboard",
            View::AdminDashboard => "admin dashboard",
            View::ClinicalDashboard => "clinical dashboard",
        };
        f.write_str(name)
    }
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Show the requested view.
    Granted(View),
    /// No active session: go sign in first.
    RedirectToSignIn,
    /// Active session, but the role is not on the allow-list.
    RedirectToLanding,
}

/// Gate a requested view against the current session.
pub fn authorize(store: &SessionStore, requested: View) -> RouteOutcome {
    if requested.is_public() {
        return RouteOutcome::Granted(requested);
    }
    if !store.is_authenticated() {
        return RouteOutcome::RedirectToSignIn;
    }
    // An active session always carries an identity.
    match store.identity().map(|identity| identity.role) {
        Some(role) if requested.allowed_roles().contains(&role) => RouteOutcome::Granted(requested),
        _ => RouteOutcome::RedirectToLanding,
    }
}

/// Resolve the root path: the default view is a function of the session
/// role alone, total over every (authenticated, role) combination.
pub fn default_view(store: &SessionStore) -> View {
    if !store.is_authenticated() {
        return View::Landing;
    }
    match store.identity().map(|identity| identity.role) {
        Some(Role::AmbulanceDriver) => View::DriverDashboard,
        Some(Role::HospitalAdmin) => View::AdminDashboard,
        Some(Role::Doctor) | Some(Role::Nurse) => View::ClinicalDashboard,
        None => View::Landing,
    }
}
