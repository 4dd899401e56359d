//! Integration tests for the sign-in / verification / routing flow.
//!
//! Runs the full console lifecycle against the mock backend and on-disk
//! session slots, including a simulated process restart.

use carelink::{
    AuthGateway, AuthState, MockBackend, MockUser, Role, RouteOutcome, SessionStore, View, routing,
};
use std::path::PathBuf;

/// Scratch directory unique to one test run.
fn scratch_dir(prefix: &str) -> PathBuf {
    let rand_id: u32 = rand::random();
    std::env::temp_dir().join(format!("{}_{}", prefix, rand_id % 100000))
}

#[tokio::test]
async fn admin_walks_the_verification_gate_end_to_end() {
    let dir = scratch_dir("carelink_admin");

    let mut gateway = AuthGateway::mock(SessionStore::on_disk(&dir));
    assert_eq!(gateway.state(), AuthState::Anonymous);

    // Demo accounts always require verification first.
    let ok = gateway
        .sign_in("admin@hospital.com", "password123", "hospital_admin")
        .await;
    assert!(!ok);
    assert_eq!(gateway.state(), AuthState::PendingVerification);

    // Any 6-character code passes the demo gate.
    assert!(gateway.verify_email("123456").await);
    assert_eq!(gateway.state(), AuthState::Authenticated);
    assert_eq!(
        gateway.store().identity().unwrap().role,
        Role::HospitalAdmin
    );

    // Driver-only view redirects away; root resolves to the admin view.
    assert_eq!(
        routing::authorize(gateway.store(), View::DriverDashboard),
        RouteOutcome::RedirectToLanding
    );
    assert_eq!(routing::default_view(gateway.store()), View::AdminDashboard);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn session_survives_a_restart() {
    let dir = scratch_dir("carelink_restart");

    let mut gateway = AuthGateway::mock(SessionStore::on_disk(&dir));
    gateway
        .sign_in("doctor@hospital.com", "password123", "doctor")
        .await;
    gateway.verify_email("000000").await;
    assert_eq!(gateway.state(), AuthState::Authenticated);
    let token = gateway.store().token().unwrap().to_string();

    // Fresh gateway over the same directory: a new process.
    let reloaded = AuthGateway::mock(SessionStore::on_disk(&dir));
    assert_eq!(reloaded.state(), AuthState::Authenticated);
    assert_eq!(reloaded.store().token(), Some(token.as_str()));
    assert_eq!(
        routing::default_view(reloaded.store()),
        View::ClinicalDashboard
    );

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn pending_marker_survives_a_restart() {
    let dir = scratch_dir("carelink_pending");

    let mut gateway = AuthGateway::mock(SessionStore::on_disk(&dir));
    gateway
        .sign_in("nurse@hospital.com", "password123", "nurse")
        .await;
    assert_eq!(gateway.state(), AuthState::PendingVerification);

    let mut reloaded = AuthGateway::mock(SessionStore::on_disk(&dir));
    assert_eq!(reloaded.state(), AuthState::PendingVerification);
    // The resend path still works from the restored marker.
    assert!(reloaded.resend_verification("").await);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn logout_is_terminal_from_any_state_even_offline() {
    let dir = scratch_dir("carelink_logout");

    // An unreachable remote backend: logout must still work.
    let mut gateway = AuthGateway::remote("http://localhost:19999/api", SessionStore::on_disk(&dir));
    gateway.logout();
    assert_eq!(gateway.state(), AuthState::Anonymous);

    // Authenticated via mock, then logged out: nothing is left on disk.
    let mut gateway = AuthGateway::mock(SessionStore::on_disk(&dir));
    gateway
        .sign_in("driver@hospital.com", "password123", "driver")
        .await;
    gateway.verify_email("999999").await;
    assert_eq!(gateway.state(), AuthState::Authenticated);
    gateway.logout();
    assert_eq!(gateway.state(), AuthState::Anonymous);

    let reloaded = AuthGateway::mock(SessionStore::on_disk(&dir));
    assert_eq!(reloaded.state(), AuthState::Anonymous);

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn verified_account_skips_the_gate() {
    let backend = MockBackend::with_users(vec![MockUser {
        id: "50".to_string(),
        name: "On-call Doc".to_string(),
        email: "oncall@hospital.com".to_string(),
        password: "s3cret".to_string(),
        role: Role::Doctor,
        hospital_id: Some("2".to_string()),
        hospital_name: Some("Hillcrest Medical".to_string()),
        email_verified: true,
    }]);
    let mut gateway = AuthGateway::new(Box::new(backend), SessionStore::in_memory());

    assert!(gateway.sign_in("oncall@hospital.com", "s3cret", "DOCTOR").await);
    assert_eq!(gateway.state(), AuthState::Authenticated);
    assert_eq!(
        routing::authorize(gateway.store(), View::ClinicalDashboard),
        RouteOutcome::Granted(View::ClinicalDashboard)
    );
}

#[tokio::test]
async fn unreachable_server_normalizes_to_false() {
    let mut gateway = AuthGateway::remote("http://localhost:19999/api", SessionStore::in_memory());
    let ok = gateway
        .sign_in("admin@hospital.com", "password123", "hospital_admin")
        .await;
    assert!(!ok);
    assert_eq!(gateway.state(), AuthState::Anonymous);
}
