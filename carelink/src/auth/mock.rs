//! In-memory auth backend for demos and tests.

use super::backend::AuthBackend;
use super::errors::{AuthError, AuthResult};
use super::models::{Identity, Role, SignInOutcome};
use async_trait::async_trait;

/// A row in the mock user table.
#[derive(Debug, Clone)]
pub struct MockUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub hospital_id: Option<String>,
    pub hospital_name: Option<String>,
    /// Verified accounts authenticate in one step; unverified accounts go
    /// through the verification gate first.
    pub email_verified: bool,
}

/// Auth backend serving a fixed user table, no network involved.
///
/// The seeded demo accounts (one per role, password `password123`) are all
/// unverified, so every demo sign-in walks through the verification gate.
/// Any 6-character code is accepted, mirroring the demo service.
pub struct MockBackend {
    users: Vec<MockUser>,
}

impl MockBackend {
    /// Backend seeded with the demo accounts.
    pub fn new() -> Self {
        let demo = |id: &str, name: &str, email: &str, role: Role| MockUser {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            role,
            hospital_id: Some("1".to_string()),
            hospital_name: Some("Riverside General".to_string()),
            email_verified: false,
        };
        Self::with_users(vec![
            demo("1", "Avery Driver", "driver@hospital.com", Role::AmbulanceDriver),
            demo("2", "Morgan Admin", "admin@hospital.com", Role::HospitalAdmin),
            demo("3", "Dr. Riley Chen", "doctor@hospital.com", Role::Doctor),
            demo("4", "Sam Nurse", "nurse@hospital.com", Role::Nurse),
        ])
    }

    /// Backend serving an explicit user table.
    pub fn with_users(users: Vec<MockUser>) -> Self {
        Self { users }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthBackend for MockBackend {
    async fn sign_in(&self, email: &str, password: &str, role: Role) -> AuthResult<SignInOutcome> {
        let user = self
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .filter(|u| u.password == password && u.role == role)
            .ok_or_else(|| AuthError::Credentials("Login failed".to_string()))?;

        Ok(SignInOutcome {
            identity: Identity {
                id: user.id.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                role: user.role,
                hospital_id: user.hospital_id.clone(),
                hospital_name: user.hospital_name.clone(),
                email_verified: user.email_verified,
            },
            token: format!("mock-token-{}", user.id),
        })
    }

    async fn verify_email(&self, code: &str) -> AuthResult<()> {
        if code.trim().len() == 6 {
            Ok(())
        } else {
            Err(AuthError::Verification(
                "Verification failed".to_string(),
            ))
        }
    }

    async fn resend_verification(&self, email: &str) -> AuthResult<()> {
        if self.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            Ok(())
        } else {
            Err(AuthError::Rejected("Unknown email".to_string()))
        }
    }
}
