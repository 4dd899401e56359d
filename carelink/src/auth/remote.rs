//! REST-backed auth operations.

use super::backend::AuthBackend;
use super::errors::{AuthError, AuthResult};
use super::models::{Identity, Role, SignInOutcome};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Auth backend talking to the hospital network's REST service.
pub struct RemoteBackend {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    role: Role,
}

/// Declared shape of a sign-in response. Fields outside this contract are
/// ignored; fields inside it are validated before anything reaches the
/// session store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id: Value,
    name: String,
    email: String,
    role: String,
    #[serde(default)]
    hospital_id: Option<Value>,
    #[serde(default)]
    hospital_name: Option<String>,
    email_verified: bool,
    #[serde(default)]
    token: Option<String>,
}

impl SignInResponse {
    /// Map the raw response onto [`SignInOutcome`], rejecting shapes that
    /// would corrupt the session store: unknown roles, missing or empty
    /// tokens for verified accounts, non-scalar ids.
    fn into_outcome(self) -> AuthResult<SignInOutcome> {
        let id = scalar_to_string(&self.id)
            .ok_or_else(|| AuthError::MalformedResponse(format!("unusable id: {}", self.id)))?;
        let role: Role = self
            .role
            .parse()
            .map_err(|_| AuthError::MalformedResponse(format!("unknown role '{}'", self.role)))?;
        let token = self.token.unwrap_or_default();
        if self.email_verified && token.is_empty() {
            return Err(AuthError::MalformedResponse(
                "verified identity without a token".to_string(),
            ));
        }
        Ok(SignInOutcome {
            identity: Identity {
                id,
                name: self.name,
                email: self.email,
                role,
                hospital_id: self.hospital_id.as_ref().and_then(scalar_to_string),
                hospital_name: self.hospital_name,
                email_verified: self.email_verified,
            },
            token,
        })
    }
}

/// The backend serializes numeric ids; older deployments sent strings.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RemoteBackend {
    /// Create a backend for the given API base URL, e.g.
    /// `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Extract the server's `{message}` body from a non-2xx response,
    /// falling back to a generic message when the body is not JSON.
    async fn error_message(response: reqwest::Response) -> String {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                message: Some(message),
            }) => message,
            _ => format!("Network error (status {status})"),
        }
    }
}

#[async_trait]
impl AuthBackend for RemoteBackend {
    async fn sign_in(&self, email: &str, password: &str, role: Role) -> AuthResult<SignInOutcome> {
        let request = SignInRequest {
            email,
            password,
            role,
        };
        let response = self
            .client
            .post(format!("{}/auth/signin", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Credentials(Self::error_message(response).await));
        }

        let raw: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;
        raw.into_outcome()
    }

    async fn verify_email(&self, code: &str) -> AuthResult<()> {
        let response = self
            .client
            .get(format!("{}/auth/verify-email", self.base_url))
            .query(&[("otp", code)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Verification(Self::error_message(response).await));
        }
        Ok(())
    }

    async fn resend_verification(&self, email: &str) -> AuthResult<()> {
        let response = self
            .client
            .post(format!("{}/auth/resend-verification", self.base_url))
            .query(&[("email", email)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Rejected(Self::error_message(response).await));
        }
        Ok(())
    }
}
