use std::sync::Arc;
use serde_json::{json, Value};

use shared_config::AppConfig;

use crate::jwt::sign_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub admin_email: String,
    pub admin_password: String,
    pub cloudinary_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            admin_email: "admin@prescripto.com".to_string(),
            admin_password: "qwerty123".to_string(),
            cloudinary_base_url: "http://localhost:54322".to_string(),
        }
    }
}

impl TestConfig {
    /// Store and image service both pointed at one mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            supabase_url: uri.to_string(),
            cloudinary_base_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            admin_email: self.admin_email.clone(),
            admin_password: self.admin_password.clone(),
            jwt_secret: self.jwt_secret.clone(),
            cloudinary_cloud_name: "test-cloud".to_string(),
            cloudinary_api_key: "test-api-key".to_string(),
            cloudinary_api_secret: "test-api-secret".to_string(),
            cloudinary_base_url: self.cloudinary_base_url.clone(),
            port: 4000,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    pub fn admin_token(&self) -> String {
        sign_token(&format!("{}{}", self.admin_email, self.admin_password), &self.jwt_secret)
            .expect("test secret is set")
    }
}

pub struct MockStoreRows;

impl MockStoreRows {
    pub fn doctor(id: &str, slots_booked: Value) -> Value {
        json!({
            "id": id,
            "name": "Dr. Richard James",
            "email": "richard@example.com",
            "image": "https://res.cloudinary.com/test-cloud/image/upload/doc1.png",
            "speciality": "General physician",
            "degree": "MBBS",
            "experience": "4 Years",
            "about": "Dr. James has a strong commitment to delivering comprehensive medical care.",
            "available": true,
            "fees": 50.0,
            "address": { "line1": "17th Cross, Richmond", "line2": "Circle, Ring Road, London" },
            "date": 1_735_689_600_000_i64,
            "slots_booked": slots_booked
        })
    }

    pub fn appointment(id: &str, doc_id: &str, slot_date: &str, slot_time: &str, date: i64) -> Value {
        json!({
            "id": id,
            "userId": "6a1f0f43-50b4-4a4f-9c80-6b1b8c0e1f11",
            "docId": doc_id,
            "slotDate": slot_date,
            "slotTime": slot_time,
            "userData": { "name": "Test Patient", "email": "patient@example.com" },
            "docData": { "name": "Dr. Richard James", "speciality": "General physician" },
            "amount": 50.0,
            "date": date,
            "cancelled": false,
            "payment": false,
            "isCompleted": false
        })
    }

    pub fn user(id: &str) -> Value {
        json!({ "id": id })
    }
}
