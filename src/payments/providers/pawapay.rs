//! Pawapay passthrough client
//!
//! Sends deposits straight to the backend's Pawapay route, bypassing the
//! smart-payment provider selection.

use crate::config::ApiConfig;
use crate::error::AppResult;
use crate::payments::http::ApiClient;
use crate::payments::providers::{prepare_request, require_code, PaymentData};
use crate::payments::registry::Provider;
use crate::payments::traits::PaymentGateway;
use crate::payments::types::{PaymentRequest, PaymentResult, PaymentStatus};
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone)]
pub struct PawapayClient {
    api: ApiClient,
}

impl PawapayClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        Ok(Self::with_api(ApiClient::new(config)?))
    }

    pub fn with_api(api: ApiClient) -> Self {
        Self { api }
    }

    /// Route for a country and Pawapay correspondent, e.g. `/pawapay/process/ZMB/MTN_MOMO_ZMB`
    pub fn endpoint(request: &PaymentRequest, correspondent: &str) -> String {
        format!(
            "/pawapay/process/{}/{}",
            request.country.as_str(),
            correspondent
        )
    }
}

#[derive(Debug, Serialize)]
struct DepositBody<'a> {
    #[serde(flatten)]
    request: &'a PaymentRequest,
    correspondent: &'static str,
}

#[async_trait]
impl PaymentGateway for PawapayClient {
    fn name(&self) -> &'static str {
        "pawapay"
    }

    async fn initiate_payment(&self, request: &PaymentRequest) -> AppResult<PaymentResult> {
        let correspondent = require_code(request, Provider::Pawapay)?;
        let wire = prepare_request(request)?;

        info!(
            "Initiating Pawapay deposit: {} {} {} (reference={})",
            wire.amount, wire.currency, correspondent, wire.reference
        );

        let body = DepositBody {
            request: &wire,
            correspondent,
        };
        let data: PaymentData = self
            .api
            .post(
                &Self::endpoint(&wire, correspondent),
                &body,
                Some(wire.reference.as_str()),
            )
            .await?;
        let result = data.into_result(PaymentStatus::Pending, Provider::Pawapay);

        info!(
            "Pawapay deposit accepted: deposit_id={:?}, status={}",
            result.payment_id, result.status
        );

        Ok(result)
    }
}
