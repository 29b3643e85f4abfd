//! Shared HTTP fixtures for the API tests

#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{Duration, Utc};
use lezit::config::{AppConfig, BootstrapAdmin};
use lezit::module::TransportModule;
use lezit::server::ServerBuilder;
use serde_json::{Value, json};

pub const ADMIN_EMAIL: &str = "ops@lezit.in";
pub const ADMIN_PASSWORD: &str = "operations-password";
pub const PASSWORD: &str = "correct-horse-battery";

/// A running API plus the bootstrap admin's token
pub struct TestApp {
    pub server: TestServer,
    pub admin: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut config = AppConfig::default();
        config.bootstrap_admin = Some(BootstrapAdmin {
            name: "Operations".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        });

        let app = ServerBuilder::new(config)
            .register_module(TransportModule)
            .build()
            .await
            .expect("Failed to build app");
        let server = TestServer::try_new(app).expect("Failed to create test server");

        let admin = login(&server, ADMIN_EMAIL, ADMIN_PASSWORD).await;
        Self { server, admin }
    }

    /// Register an account and return `(token, user id)`
    pub async fn register(&self, role: &str, email: &str) -> (String, String) {
        let mut body = json!({
            "name": format!("{role} account"),
            "email": email,
            "password": PASSWORD,
            "role": role,
        });
        match role {
            "vendor" => body["company_name"] = json!("Ghat Road Carriers"),
            "driver" => body["license_number"] = json!("MH1220190001234"),
            _ => {}
        }

        let response = self.server.post("/api/auth/register").json(&body).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let auth: Value = response.json();
        (
            auth["token"].as_str().unwrap().to_string(),
            auth["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    pub async fn create_booking(&self, customer: &str) -> Value {
        let response = self
            .server
            .post("/api/bookings")
            .authorization_bearer(customer)
            .json(&booking_request())
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    /// Quotation created and sent by the admin
    pub async fn send_quotation(&self, booking_id: &str, amount: f64) -> Value {
        let response = self
            .server
            .post(&format!("/api/bookings/{booking_id}/quotations"))
            .authorization_bearer(&self.admin)
            .json(&json!({ "amount": amount }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let quotation: Value = response.json();

        let response = self
            .server
            .post(&format!("/api/quotations/{}/send", quotation["id"].as_str().unwrap()))
            .authorization_bearer(&self.admin)
            .await;
        response.assert_status_ok();
        response.json()
    }
}

pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["token"].as_str().unwrap().to_string()
}

pub fn booking_request() -> Value {
    json!({
        "pickup_location": "Bhiwandi Warehouse 4",
        "drop_location": "Pune MIDC Chakan",
        "pickup_date": (Utc::now() + Duration::days(3)).to_rfc3339(),
        "goods_type": "Packaged FMCG",
        "weight_tons": 6.5,
        "vehicle_type": "truck",
    })
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}
