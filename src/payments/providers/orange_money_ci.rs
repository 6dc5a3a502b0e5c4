//! Orange Money Côte d'Ivoire client
//!
//! The customer dials the operator's USSD code to obtain a one-time password and
//! types it into the checkout form; the payment is confirmed in one request.

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::payments::http::ApiClient;
use crate::payments::providers::{prepare_request, PaymentData};
use crate::payments::registry::{PaymentMethod, Provider};
use crate::payments::traits::OtpConfirmer;
use crate::payments::types::{PaymentRequest, PaymentResult, PaymentStatus};
use crate::payments::validation::validate_otp;
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

const ORANGE_MONEY_CI_ENDPOINT: &str = "/process-orange-money-ci-payment";

/// USSD code customers dial to generate the payment OTP
pub const OTP_USSD_CODE: &str = "#144*82#";

#[derive(Debug, Clone)]
pub struct OrangeMoneyCiClient {
    api: ApiClient,
}

impl OrangeMoneyCiClient {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        Ok(Self::with_api(ApiClient::new(config)?))
    }

    pub fn with_api(api: ApiClient) -> Self {
        Self { api }
    }
}

#[derive(Debug, Serialize)]
struct OtpPaymentBody<'a> {
    #[serde(flatten)]
    request: &'a PaymentRequest,
    otp_code: &'a str,
}

#[async_trait]
impl OtpConfirmer for OrangeMoneyCiClient {
    async fn confirm_with_otp(
        &self,
        request: &PaymentRequest,
        otp_code: &str,
    ) -> AppResult<PaymentResult> {
        if request.payment_method != PaymentMethod::OrangeMoneyCi {
            return Err(AppError::validation(
                "payment_method",
                format!(
                    "{} cannot be confirmed with an Orange Money OTP",
                    request.payment_method
                ),
            ));
        }
        validate_otp(otp_code)?;
        let wire = prepare_request(request)?;

        info!(
            "Confirming Orange Money CI payment: {} {} (reference={})",
            wire.amount, wire.currency, wire.reference
        );

        let body = OtpPaymentBody {
            request: &wire,
            otp_code: otp_code.trim(),
        };
        let data: PaymentData = self
            .api
            .post(ORANGE_MONEY_CI_ENDPOINT, &body, Some(wire.reference.as_str()))
            .await?;
        let result = data.into_result(PaymentStatus::Success, Provider::Paydunya);

        info!(
            "Orange Money CI payment confirmed: transaction_id={:?}, status={}",
            result.payment_id, result.status
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn create_test_client() -> OrangeMoneyCiClient {
        OrangeMoneyCiClient::new(&ApiConfig::new("http://127.0.0.1:9")).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_other_methods() {
        let request = PaymentRequest::new(PaymentMethod::MtnMomoCi, dec!(500), "2250505123456")
            .with_customer("Koffi Yao", "koffi@example.com");
        let err = create_test_client()
            .confirm_with_otp(&request, "1234")
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_rejects_malformed_otp() {
        let request = PaymentRequest::new(PaymentMethod::OrangeMoneyCi, dec!(500), "2250707123456")
            .with_customer("Koffi Yao", "koffi@example.com");
        let err = create_test_client()
            .confirm_with_otp(&request, "12")
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
