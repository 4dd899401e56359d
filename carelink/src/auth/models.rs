//! Authentication data models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Staff role recognized by the hospital network.
///
/// The wire form is the screaming-snake name (`AMBULANCE_DRIVER`,
/// `HOSPITAL_ADMIN`, `DOCTOR`, `NURSE`). Parsing accepts any casing plus
/// the short aliases `driver` and `admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    AmbulanceDriver,
    HospitalAdmin,
    Doctor,
    Nurse,
}

impl Role {
    /// All recognized roles.
    pub const ALL: [Role; 4] = [
        Role::AmbulanceDriver,
        Role::HospitalAdmin,
        Role::Doctor,
        Role::Nurse,
    ];

    /// Canonical wire representation sent to and received from the backend.
    pub fn as_wire(self) -> &'static str {
        match self {
            Role::AmbulanceDriver => "AMBULANCE_DRIVER",
            Role::HospitalAdmin => "HOSPITAL_ADMIN",
            Role::Doctor => "DOCTOR",
            Role::Nurse => "NURSE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Error returned when a role string is not one of the recognized values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized role '{0}'")]
pub struct UnknownRoleError(pub String);

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ambulance_driver" | "driver" => Ok(Role::AmbulanceDriver),
            "hospital_admin" | "admin" => Ok(Role::HospitalAdmin),
            "doctor" => Ok(Role::Doctor),
            "nurse" => Ok(Role::Nurse),
            _ => Err(UnknownRoleError(s.to_string())),
        }
    }
}

/// Authenticated user profile.
///
/// Created from a successful sign-in response and immutable afterwards
/// except for the verified flag, which the gateway flips when a
/// verification code is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    pub email_verified: bool,
}

/// What a backend hands back for an accepted sign-in: the identity it
/// resolved plus the bearer token minted for it. The gateway only commits
/// the pair once the identity is verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutcome {
    pub identity: Identity,
    pub token: String,
}

/// Observable state of the auth gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No session and no verification in flight.
    Anonymous,
    /// Credentials were accepted but the email is not yet verified.
    PendingVerification,
    /// A non-empty token is held for a verified identity.
    Authenticated,
}
