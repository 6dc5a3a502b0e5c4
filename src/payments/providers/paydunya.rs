//! PayDunya passthrough client
//!
//! PayDunya either confirms the payment on the customer's handset or returns a
//! checkout URL the customer must be redirected to.

use crate::config::ApiConfig;
use crate::error::AppResult;
use crate::payments::http::ApiClient;
use crate::payments::providers::{prepare_request, require_code, PaymentData};
use crate::payments::registry::{Country, Currency, Provider};
use crate::payments::traits::PaymentGateway;
use crate::payments::types::{PaymentRequest, PaymentResult, PaymentStatus};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

const PAYDUNYA_ENDPOINT: &str = "/process-paydunya-payment";

#[derive(Debug, Clone)]
pub struct PaydunyaClient {
    api: ApiClient,
}

impl PaydunyaClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        Ok(Self::with_api(ApiClient::new(config)?))
    }

    pub fn with_api(api: ApiClient) -> Self {
        Self { api }
    }
}

// Same fields as PaymentRequest, but `payment_method` carries the PayDunya slug
#[derive(Debug, Serialize)]
struct PaydunyaBody<'a> {
    amount: Decimal,
    currency: Currency,
    phone_number: &'a str,
    country: Country,
    payment_method: &'static str,
    customer_name: &'a str,
    customer_email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_id: Option<&'a str>,
    reference: &'a str,
}

#[async_trait]
impl PaymentGateway for PaydunyaClient {
    fn name(&self) -> &'static str {
        "paydunya"
    }

    async fn initiate_payment(&self, request: &PaymentRequest) -> AppResult<PaymentResult> {
        let slug = require_code(request, Provider::Paydunya)?;
        let wire = prepare_request(request)?;

        info!(
            "Initiating PayDunya payment: {} {} {} (reference={})",
            wire.amount, wire.currency, slug, wire.reference
        );

        let body = PaydunyaBody {
            amount: wire.amount,
            currency: wire.currency,
            phone_number: &wire.phone_number,
            country: wire.country,
            payment_method: slug,
            customer_name: &wire.customer_name,
            customer_email: &wire.customer_email,
            order_id: wire.order_id.as_deref(),
            product_id: wire.product_id.as_deref(),
            reference: &wire.reference,
        };

        let data: PaymentData = self
            .api
            .post(PAYDUNYA_ENDPOINT, &body, Some(wire.reference.as_str()))
            .await?;
        let result = data.into_result(PaymentStatus::Pending, Provider::Paydunya);

        info!(
            "PayDunya payment accepted: status={}, redirect={}",
            result.status,
            result.redirect_url.is_some()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::registry::PaymentMethod;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_rejects_method_without_slug() {
        let client = PaydunyaClient::new(&ApiConfig::new("http://127.0.0.1:9")).unwrap();
        let request = PaymentRequest::new(PaymentMethod::MpesaKenya, dec!(100), "254712345678")
            .with_customer("Wanjiru Kamau", "wanjiru@example.com");
        let err = client.initiate_payment(&request).await.unwrap_err();
        assert!(err.is_validation());
    }
}
