//! JSON transport shared by every payment client
//!
//! Each call is a single request. There is no retry loop: provider fallback is
//! the backend's job, and a failed call is reported to the caller as-is.

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult, CONNECTIVITY_MESSAGE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// HTTP client bound to one backend base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// POST a JSON body and decode the `data` member of the response envelope
    pub async fn post<B, T>(
        &self,
        endpoint: &str,
        body: &B,
        idempotency_key: Option<&str>,
    ) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("POST {}", url);

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = idempotency_key {
            request = request.header(IDEMPOTENCY_HEADER, key);
        }

        self.send(request, endpoint).await
    }

    /// GET with query parameters and decode the `data` member of the response envelope
    pub async fn get<T>(&self, endpoint: &str, query: &[(&str, &str)]) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("GET {} {:?}", url, query);

        let request = self.client.get(&url).query(query);
        self.send(request, endpoint).await
    }

    /// Issue a bare GET and report only the status code
    pub async fn probe(&self, endpoint: &str) -> Result<StatusCode, reqwest::Error> {
        let response = self.client.get(self.url(endpoint)).send().await?;
        Ok(response.status())
    }

    async fn send<T>(&self, request: RequestBuilder, endpoint: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", endpoint, e);
            AppError::from(e).with_context(endpoint.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!("Failed to read response body from {}: {}", endpoint, e);
            AppError::from(e).with_context(endpoint.to_string())
        })?;

        decode_response(status, &body).map_err(|e| e.with_context(endpoint.to_string()))
    }
}

// Response envelope shared by every backend endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    details: Option<Value>,
    #[serde(default)]
    data: Option<Value>,
}

impl Envelope {
    fn error_message(&self) -> Option<String> {
        if let Some(message) = self.message.as_ref().filter(|m| !m.trim().is_empty()) {
            return Some(message.clone());
        }
        match &self.error {
            Some(Value::String(message)) if !message.trim().is_empty() => Some(message.clone()),
            Some(Value::Object(object)) => object
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }
    }

    fn error_details(&self) -> Option<Value> {
        self.details.clone().or_else(|| match &self.error {
            Some(Value::Object(_)) => self.error.clone(),
            _ => None,
        })
    }
}

/// Classify a backend response into data, a business error or a network error
pub(crate) fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> AppResult<T> {
    let envelope = match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            if status.is_success() {
                error!("Failed to parse payment backend response: {}", e);
            } else {
                warn!("Payment backend returned HTTP {} without an error payload", status);
            }
            return Err(AppError::network(format!(
                "HTTP {}: unreadable response body",
                status.as_u16()
            )));
        }
    };

    if status.is_success() && envelope.success != Some(false) {
        let data = envelope.data.unwrap_or(Value::Null);
        return serde_json::from_value(data).map_err(|e| {
            error!("Payment backend response has an unexpected shape: {}", e);
            AppError::network(format!("Invalid response format: {}", e))
        });
    }

    match envelope.error_message() {
        Some(message) => {
            warn!("Payment backend rejected request (HTTP {}): {}", status, message);
            Err(AppError::business(
                message,
                envelope.error_details(),
                Some(status.as_u16()),
            ))
        }
        None if status.is_success() => Err(AppError::business(
            "The payment could not be processed",
            envelope.error_details(),
            Some(status.as_u16()),
        )),
        None => {
            warn!("Payment backend returned HTTP {} with no message", status);
            Err(AppError::network(format!(
                "HTTP {}: {}",
                status.as_u16(),
                CONNECTIVITY_MESSAGE
            )))
        }
    }
}
