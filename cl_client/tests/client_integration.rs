//! Integration tests for cl_client network functionality.
//!
//! Tests that transport failures surface as errors with usable messages
//! rather than panics, for both the data client and the auth flow.

use carelink::{AuthGateway, AuthState, SessionStore};
use cl_client::api_client::ApiClient;
use cl_client::config::ClientConfig;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;

fn scratch_session_dir(tag: &str) -> PathBuf {
    let suffix: u32 = rand::random();
    std::env::temp_dir().join(format!("cl_client_{tag}_{suffix}"))
}

#[tokio::test]
async fn connection_refused_is_an_error_not_a_panic() {
    // No server listens on this port.
    let client = ApiClient::new("http://localhost:19999/api");

    let result = client.hospitals().await;
    assert!(result.is_err(), "Should fail when server is not available");
    let error_msg = format!("{:#}", result.unwrap_err());
    assert!(
        error_msg.contains("Failed to reach"),
        "Error should indicate connection failure, got: {error_msg}"
    );
}

#[tokio::test]
async fn unreachable_host_times_out_or_errors() {
    // Non-routable address.
    let client = ApiClient::new("http://192.0.2.1:80/api");

    let result = timeout(Duration::from_secs(3), client.check_health()).await;
    assert!(
        result.is_err() || result.unwrap().is_err(),
        "Should fail when connecting to unreachable host"
    );
}

#[tokio::test]
async fn invalid_hostname_is_an_error() {
    let client = ApiClient::new("http://invalid-hostname-that-does-not-exist.local/api");
    assert!(client.my_ambulance().await.is_err());
}

#[tokio::test]
async fn malformed_url_is_an_error() {
    let client = ApiClient::new("not-a-valid-url");
    assert!(client.hospital_stats("1").await.is_err());
}

#[tokio::test]
async fn auth_flow_degrades_to_false_when_offline() {
    // The gateway normalizes the same transport failures to booleans and
    // keeps a form-safe message that does not leak reachability.
    let dir = scratch_session_dir("offline");
    let mut gateway =
        AuthGateway::remote("http://localhost:19999/api", SessionStore::on_disk(&dir));
    assert!(
        !gateway
            .sign_in("admin@hospital.com", "password123", "admin")
            .await
    );
    assert_eq!(gateway.state(), AuthState::Anonymous);
    assert_eq!(gateway.last_error(), Some("Network error"));

    // The failed attempt must not persist anything.
    assert!(!dir.join("token").exists());
    assert!(!dir.join("pending_email").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn config_defaults_are_usable() {
    let config = ClientConfig::from_env(None, Some(PathBuf::from("/tmp/cl_test_session")), false);
    assert!(config.server_url.starts_with("http"));
    assert_eq!(config.session_dir, PathBuf::from("/tmp/cl_test_session"));
}
