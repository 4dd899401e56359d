//! HTTP API client for the hospital network backend.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Authenticated API client for the dashboard data endpoints.
///
/// Every request sends JSON and, when a bearer token is set, an
/// `Authorization: Bearer <token>` header. Non-2xx responses are parsed as
/// `{message}` bodies, falling back to a generic network error message.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    token: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambulance {
    pub id: i64,
    pub vehicle_number: String,
    pub status: String,
    #[serde(default)]
    pub current_latitude: Option<f64>,
    #[serde(default)]
    pub current_longitude: Option<f64>,
    #[serde(default)]
    pub pickup_address: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub emergency_level: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_level: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub total_beds: Option<i64>,
    #[serde(default)]
    pub available_beds: Option<i64>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalStats {
    pub total_beds: i64,
    pub available_beds: i64,
    pub occupied_beds: i64,
    pub doctors: i64,
    pub nurses: i64,
    pub drivers: i64,
    pub ambulances: i64,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bed {
    pub id: i64,
    pub bed_number: String,
    #[serde(default)]
    pub bed_type: Option<String>,
    pub status: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient_contact: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkHour {
    pub id: i64,
    pub work_date: NaiveDate,
    #[serde(default)]
    pub scheduled_hours: Option<f64>,
    #[serde(default)]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub overtime_hours: Option<f64>,
    #[serde(default)]
    pub department: Option<String>,
}

impl ApiClient {
    /// Create a client for the given API base URL, e.g.
    /// `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
            token: None,
        }
    }

    /// Attach (or drop) the bearer token used for authenticated requests.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Generic request helper shared by every endpoint.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Content-Type", "application/json")
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach {path}"))?;

        if !response.status().is_success() {
            #[derive(serde::Deserialize)]
            struct ErrorBody {
                message: Option<String>,
            }
            let status = response.status();
            let message = match response.json::<ErrorBody>().await {
                Ok(ErrorBody {
                    message: Some(message),
                }) => message,
                _ => format!("Network error (status {status})"),
            };
            bail!("{message}");
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {path}"))
    }

    /// Probe the backend health endpoint. The body is plain text, not JSON.
    pub async fn check_health(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/test/health", self.base_url))
            .send()
            .await
            .context("Failed to reach the backend")?;
        if !response.status().is_success() {
            bail!("Backend health check failed (status {})", response.status());
        }
        response.text().await.context("Failed to read health response")
    }

    // Ambulances

    pub async fn hospital_ambulances(&self, hospital_id: &str) -> Result<Vec<Ambulance>> {
        self.request(
            Method::GET,
            &format!("/ambulances/hospital/{hospital_id}"),
            &[],
            None,
        )
        .await
    }

    pub async fn my_ambulance(&self) -> Result<Ambulance> {
        self.request(Method::GET, "/ambulances/my-ambulance", &[], None)
            .await
    }

    pub async fn update_ambulance_location(&self, update: &LocationUpdate) -> Result<Ambulance> {
        let body = serde_json::to_value(update).context("Failed to encode location update")?;
        self.request(Method::PUT, "/ambulances/update-location", &[], Some(&body))
            .await
    }

    // Hospitals

    pub async fn hospitals(&self) -> Result<Vec<Hospital>> {
        self.request(Method::GET, "/hospitals", &[], None).await
    }

    pub async fn hospital_stats(&self, hospital_id: &str) -> Result<HospitalStats> {
        self.request(
            Method::GET,
            &format!("/hospitals/{hospital_id}/stats"),
            &[],
            None,
        )
        .await
    }

    // Beds

    pub async fn hospital_beds(&self, hospital_id: &str) -> Result<Vec<Bed>> {
        self.request(Method::GET, &format!("/beds/hospital/{hospital_id}"), &[], None)
            .await
    }

    pub async fn assign_bed(
        &self,
        bed_id: &str,
        patient_name: &str,
        patient_contact: &str,
    ) -> Result<Bed> {
        self.request(
            Method::PUT,
            &format!("/beds/{bed_id}/assign"),
            &[
                ("patientName", patient_name),
                ("patientContact", patient_contact),
            ],
            None,
        )
        .await
    }

    // Staff

    pub async fn hospital_staff(&self, hospital_id: &str) -> Result<Vec<StaffMember>> {
        self.request(
            Method::GET,
            &format!("/users/hospital/{hospital_id}"),
            &[],
            None,
        )
        .await
    }

    pub async fn work_hours(&self, user_id: &str) -> Result<Vec<WorkHour>> {
        self.request(
            Method::GET,
            &format!("/users/{user_id}/work-hours"),
            &[],
            None,
        )
        .await
    }
}
