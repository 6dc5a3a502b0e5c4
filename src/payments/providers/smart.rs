//! Smart-payment aggregation client
//!
//! The backend picks a provider for each payment and silently falls back to a
//! secondary one when the primary fails. This client only relays: it validates,
//! sends one request, and reports what the backend said.

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::payments::http::ApiClient;
use crate::payments::providers::{prepare_request, PaymentData};
use crate::payments::registry::{Country, PaymentMethod, Provider};
use crate::payments::traits::PaymentGateway;
use crate::payments::types::{
    HealthStatus, MethodAvailability, PaymentRequest, PaymentResult, PaymentStatus, ProviderPair,
    StatusQuery,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const INITIALIZE_ENDPOINT: &str = "/smart-payment/initialize";
const CHECK_STATUS_ENDPOINT: &str = "/smart-payment/check-status";
const AVAILABLE_METHODS_ENDPOINT: &str = "/smart-payment/available-methods";
const HEALTH_ENDPOINT: &str = "/health";

/// Client for the `/smart-payment/*` endpoints
#[derive(Debug, Clone)]
pub struct SmartPaymentClient {
    api: ApiClient,
}

impl SmartPaymentClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        Ok(Self::with_api(ApiClient::new(config)?))
    }

    pub fn with_api(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the current status of a payment. One request per call; the caller
    /// decides whether and when to poll again.
    pub async fn check_status(&self, query: &StatusQuery) -> AppResult<PaymentResult> {
        if query.payment_id.trim().is_empty() {
            return Err(AppError::validation("payment_id", "Payment id is required"));
        }
        if query.provider == Provider::Unknown {
            return Err(AppError::validation(
                "provider",
                "Provider is required to check a payment status",
            ));
        }

        debug!(
            "Checking payment status: payment_id={}, provider={}",
            query.payment_id, query.provider
        );

        let data: PaymentData = self.api.post(CHECK_STATUS_ENDPOINT, query, None).await?;
        let mut result = data.into_result(PaymentStatus::Pending, query.provider);
        if result.payment_id.is_none() {
            result.payment_id = Some(query.payment_id.clone());
        }

        info!(
            "Payment status: payment_id={}, provider={}, status={}",
            query.payment_id, result.provider, result.status
        );

        Ok(result)
    }

    /// Provider pairs for every method the backend offers in `country`
    pub async fn fetch_available_methods(&self, country: Country) -> AppResult<MethodAvailability> {
        let data: AvailableMethodsData = self
            .api
            .get(AVAILABLE_METHODS_ENDPOINT, &[("country", country.as_str())])
            .await?;

        let mut availability = MethodAvailability::new();
        for (key, pair) in data.methods {
            let primary = match pair.primary {
                Some(provider) if provider != Provider::Unknown => provider,
                _ => {
                    warn!("Dropping method {} for {}: no usable primary provider", key, country);
                    continue;
                }
            };

            if PaymentMethod::from_key(&key).is_none() {
                debug!("Backend offers method {} unknown to the registry", key);
            }

            let fallback = pair
                .fallback
                .filter(|provider| *provider != Provider::Unknown && *provider != primary);
            availability.insert(key, ProviderPair { primary, fallback });
        }

        debug!("{} payment methods available for {}", availability.len(), country);
        Ok(availability)
    }

    /// Like `fetch_available_methods`, but any failure yields an empty map
    pub async fn available_methods(&self, country: Country) -> MethodAvailability {
        match self.fetch_available_methods(country).await {
            Ok(availability) => availability,
            Err(e) => {
                warn!("Payment method discovery failed for {}: {}", country, e);
                MethodAvailability::new()
            }
        }
    }

    pub async fn health_check(&self) -> HealthStatus {
        let start_time = Instant::now();
        let base_url = self.api.base_url().to_string();

        debug!("Performing health check for payment backend at: {}", base_url);

        let result = self.api.probe(HEALTH_ENDPOINT).await;
        let response_time_ms = start_time.elapsed().as_millis() as u64;
        let last_check = chrono::Utc::now().to_rfc3339();

        match result {
            Ok(status) if status.is_success() => {
                info!(
                    "Payment backend health check passed - Response time: {}ms",
                    response_time_ms
                );
                HealthStatus {
                    is_healthy: true,
                    base_url,
                    response_time_ms,
                    last_check,
                    error_message: None,
                }
            }
            Ok(status) => {
                let error_msg = format!("HTTP status: {}", status);
                error!("Payment backend health check failed: {}", error_msg);
                HealthStatus {
                    is_healthy: false,
                    base_url,
                    response_time_ms,
                    last_check,
                    error_message: Some(error_msg),
                }
            }
            Err(e) => {
                let error_msg = format!("Request failed: {}", e);
                error!("Payment backend health check failed: {}", error_msg);
                HealthStatus {
                    is_healthy: false,
                    base_url,
                    response_time_ms,
                    last_check,
                    error_message: Some(error_msg),
                }
            }
        }
    }
}

#[async_trait]
impl PaymentGateway for SmartPaymentClient {
    fn name(&self) -> &'static str {
        "smart-payment"
    }

    async fn initiate_payment(&self, request: &PaymentRequest) -> AppResult<PaymentResult> {
        let wire = prepare_request(request)?;

        info!(
            "Initiating smart payment: {} {} via {} (reference={})",
            wire.amount, wire.currency, wire.payment_method, wire.reference
        );

        let data: PaymentData = self
            .api
            .post(INITIALIZE_ENDPOINT, &wire, Some(wire.reference.as_str()))
            .await?;
        let result = data.into_result(PaymentStatus::Initiated, Provider::Unknown);

        let entry = wire.payment_method.entry();
        if !entry.serves(result.provider) {
            warn!(
                "Backend routed {} through {}, expected {} or {:?}",
                wire.payment_method, result.provider, entry.primary, entry.fallback
            );
        }

        info!(
            "Smart payment initiated: reference={}, provider={}, status={}, fallback_used={}",
            wire.reference, result.provider, result.status, result.fallback_used
        );

        Ok(result)
    }
}

// `data` of GET /smart-payment/available-methods
#[derive(Debug, Deserialize)]
struct AvailableMethodsData {
    #[serde(default)]
    methods: BTreeMap<String, RawProviderPair>,
}

#[derive(Debug, Deserialize)]
struct RawProviderPair {
    #[serde(default)]
    primary: Option<Provider>,
    #[serde(default)]
    fallback: Option<Provider>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client() -> SmartPaymentClient {
        SmartPaymentClient::new(&ApiConfig::new("http://127.0.0.1:9/api/")).unwrap()
    }

    #[tokio::test]
    async fn test_check_status_requires_payment_id() {
        let client = create_test_client();
        let err = client
            .check_status(&StatusQuery::new("  ", Provider::Pawapay))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_check_status_requires_known_provider() {
        let client = create_test_client();
        let err = client
            .check_status(&StatusQuery::new("dep-1", Provider::Unknown))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = create_test_client();
        assert_eq!(client.api.base_url(), "http://127.0.0.1:9/api");
        assert_eq!(
            client.api.url(INITIALIZE_ENDPOINT),
            "http://127.0.0.1:9/api/smart-payment/initialize"
        );
    }

    #[test]
    fn test_raw_pair_tolerates_null_fallback() {
        let pair: RawProviderPair =
            serde_json::from_str(r#"{"primary": "pawapay", "fallback": null}"#).unwrap();
        assert_eq!(pair.primary, Some(Provider::Pawapay));
        assert_eq!(pair.fallback, None);
    }
}
