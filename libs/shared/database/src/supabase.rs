use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// PostgREST client for the `doctors`, `appointments` and `users` collections.
///
/// Requests run with the service key, the admin panel sees every row.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.service_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_key))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where T: DeserializeOwned {
        self.request_with_query(method, path, &[], body, None).await
    }

    /// Query parameters are url-encoded by reqwest, so filter values may carry JSON.
    pub async fn request_with_query<T>(&self, method: Method, path: &str,
                                       query: &[(&str, String)],
                                       body: Option<Value>,
                                       extra_headers: Option<HeaderMap>)
                                       -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Store error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("Store error ({}): {}", status, error_text),
            });
        }

        // PATCH without a representation comes back as 204 with no body
        let bytes = response.bytes().await?;
        let data = if bytes.is_empty() {
            serde_json::from_value(Value::Null)?
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(data)
    }

    /// `Prefer: return=representation` so writes echo the affected rows.
    pub fn representation_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(url: String) -> AppConfig {
        AppConfig {
            supabase_url: url,
            supabase_service_key: "service-key".to_string(),
            admin_email: String::new(),
            admin_password: String::new(),
            jwt_secret: String::new(),
            cloudinary_cloud_name: String::new(),
            cloudinary_api_key: String::new(),
            cloudinary_api_secret: String::new(),
            cloudinary_base_url: String::new(),
            port: 4000,
        }
    }

    #[tokio::test]
    async fn sends_service_key_and_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/doctors"))
            .and(header("apikey", "service-key"))
            .and(header("Authorization", "Bearer service-key"))
            .and(query_param("slots_booked", "eq.{\"10_1_2025\":[\"10:00 AM\"]}"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config(mock_server.uri()));
        let rows: Vec<Value> = client.request_with_query(
            Method::GET,
            "/rest/v1/doctors",
            &[("slots_booked", "eq.{\"10_1_2025\":[\"10:00 AM\"]}".to_string())],
            None,
            None,
        ).await.unwrap();

        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn empty_body_is_accepted() {
        let mock_server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/appointments"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config(mock_server.uri()));
        let result: Option<Value> = client
            .request(Method::PATCH, "/rest/v1/appointments", Some(json!({"cancelled": true})))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn store_errors_carry_status_text() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config(mock_server.uri()));
        let err = client
            .request::<Vec<Value>>(Method::GET, "/rest/v1/users", None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("boom"));
    }
}
