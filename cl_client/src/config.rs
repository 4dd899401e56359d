//! Client configuration.
//!
//! Consolidates environment variable reads and applies CLI overrides.

use std::env;
use std::path::PathBuf;

/// Complete client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, including the `/api` prefix.
    pub server_url: String,
    /// Directory holding the persisted session slots.
    pub session_dir: PathBuf,
    /// Use the in-memory demo backend instead of the REST service.
    pub use_mock: bool,
}

impl ClientConfig {
    /// Load configuration from environment variables, with CLI overrides
    /// taking precedence.
    ///
    /// Environment:
    /// - `CARELINK_SERVER`: API base URL (default `http://localhost:8080/api`)
    /// - `CARELINK_SESSION_DIR`: session directory (default `.carelink_session`)
    pub fn from_env(
        server_override: Option<String>,
        session_dir_override: Option<PathBuf>,
        use_mock: bool,
    ) -> Self {
        let server_url = server_override
            .or_else(|| env::var("CARELINK_SERVER").ok())
            .unwrap_or_else(|| "http://localhost:8080/api".to_string());
        let session_dir = session_dir_override
            .or_else(|| env::var("CARELINK_SESSION_DIR").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(".carelink_session"));
        Self {
            server_url,
            session_dir,
            use_mock,
        }
    }
}
