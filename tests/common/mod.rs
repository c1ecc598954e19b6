//! Shared test utilities for integration tests.
//!
//! `TestClient` serves the router over a temporary JSON source file holding
//! [`FIXTURE`], so every test starts from the same dataset.

#![allow(dead_code)]

use std::io::Write;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::NamedTempFile;
use tower::ServiceExt;
use vendorlens::config::{Config, SourceLocation};
use vendorlens::handlers;
use vendorlens::state::AppState;

/// Five CRM records:
/// - Acme "CRM Seats": monthly, 2024, $100, Engineering with a $5,000 budget.
/// - Beta "Design Suite": yearly, 2024-2025, $1,200, Marketing without budget.
/// - Gamma "Legacy Hosting": quarterly, 2023, $300, inactive, no department,
///   null category name, no vendor profile.
/// - Acme "CRM Seats" again with the same amount but a zero-length span.
/// - Delta "Trial": monthly, Jan-Mar 2024, $10, no due dates.
pub const FIXTURE: &str = r#"{
  "lines": [
    {
      "SubscriptionName": "CRM Seats",
      "VendorName": "Acme",
      "SubscriptionStartDate": "2024-01-01T00:00:00Z",
      "SubscriptionEndDate": "2025-01-01T00:00:00Z",
      "NextDueDate": "2024-06-01T00:00:00Z",
      "LastDueDate": "2024-05-01T00:00:00Z",
      "SubscriptionFrequency": "1 Months",
      "SubscriptionContractAmount": { "Value": 100 },
      "DepartmentNames": { "Name": "Engineering", "Budget": 5000 },
      "SubscriptionCategory": { "Name": "Software" },
      "VendorProfile": 0,
      "status": 0
    },
    {
      "SubscriptionName": "Design Suite",
      "VendorName": "Beta",
      "SubscriptionStartDate": "2024-01-15T00:00:00Z",
      "SubscriptionEndDate": "2026-01-15T00:00:00Z",
      "NextDueDate": "2025-01-15T00:00:00Z",
      "LastDueDate": "2024-01-15T00:00:00Z",
      "SubscriptionFrequency": "1 Year",
      "SubscriptionContractAmount": { "Value": 1200 },
      "DepartmentNames": { "Name": "Marketing" },
      "SubscriptionCategory": { "Name": "Software" },
      "VendorProfile": 1,
      "status": 0
    },
    {
      "SubscriptionName": "Legacy Hosting",
      "VendorName": "Gamma",
      "SubscriptionStartDate": "2023-03-01T00:00:00Z",
      "SubscriptionEndDate": "2024-03-01T00:00:00Z",
      "NextDueDate": "2023-12-01T00:00:00Z",
      "LastDueDate": "2023-12-01T00:00:00Z",
      "SubscriptionFrequency": "3 Months",
      "SubscriptionContractAmount": { "Value": 300 },
      "SubscriptionCategory": { "Name": null },
      "VendorProfile": null,
      "status": 1
    },
    {
      "SubscriptionName": "CRM Seats",
      "VendorName": "Acme",
      "SubscriptionStartDate": "2024-02-01T00:00:00Z",
      "SubscriptionEndDate": "2024-02-01T00:00:00Z",
      "SubscriptionFrequency": "1 Months",
      "SubscriptionContractAmount": { "Value": 100 },
      "status": 0
    },
    {
      "SubscriptionName": "Trial",
      "VendorName": "Delta",
      "SubscriptionStartDate": "2024-01-01",
      "SubscriptionEndDate": "2024-04-01",
      "SubscriptionFrequency": "1 months",
      "SubscriptionContractAmount": { "Value": 10 },
      "SubscriptionCategory": { "Name": "Tools" },
      "status": 0
    }
  ]
}"#;

pub struct TestClient {
    state: AppState,
    source: NamedTempFile,
}

impl TestClient {
    /// A client whose dataset is [`FIXTURE`], already loaded.
    pub async fn new() -> Self {
        Self::with_payload(FIXTURE).await
    }

    pub async fn with_payload(payload: &str) -> Self {
        let mut source = NamedTempFile::new().expect("Failed to create temp source");
        source
            .write_all(payload.as_bytes())
            .expect("Failed to write temp source");

        let config = Config {
            host: "127.0.0.1".into(),
            port: 7171,
            source: SourceLocation::File(source.path().to_path_buf()),
            page_size: 10,
        };

        let state = AppState::new(config);
        state.reload().await.expect("Failed to load fixture");

        Self { state, source }
    }

    /// Replace the source file contents without reloading.
    pub fn rewrite_source(&self, payload: &str) {
        std::fs::write(self.source.path(), payload).expect("Failed to rewrite source");
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<(String, String)>, String) {
        let response = self.router().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let (status, _, body) = self
            .send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        (status, body)
    }

    /// Make a GET request and return status, headers and body.
    pub async fn get_with_headers(&self, uri: &str) -> (StatusCode, Vec<(String, String)>, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request and parse the body as JSON.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        let json = serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("{} returned non-JSON body {:?}: {}", uri, body, e));
        (status, json)
    }

    /// Make an empty POST request and parse the body as JSON.
    pub async fn post_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        let json = serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("{} returned non-JSON body {:?}: {}", uri, body, e));
        (status, json)
    }
}

/// Numbers from a JSON array of floats.
pub fn floats(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .expect("expected an array")
        .iter()
        .map(|v| v.as_f64().expect("expected a number"))
        .collect()
}

/// Strings from a JSON array of strings.
pub fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("expected an array")
        .iter()
        .map(|v| v.as_str().expect("expected a string").to_string())
        .collect()
}
