//! Payment client trait definitions

use crate::error::AppResult;
use crate::payments::types::{PaymentRequest, PaymentResult};
use async_trait::async_trait;

/// Anything that can start a payment from a `PaymentRequest`
///
/// Implemented by the smart-payment client and by each provider passthrough
/// client. Implementations validate the request before sending it and send it
/// exactly once.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Initiate a payment
    ///
    /// # Returns
    /// * `PaymentResult` - the accepted payment, or a validation, business or network error
    async fn initiate_payment(&self, request: &PaymentRequest) -> AppResult<PaymentResult>;
}

/// Confirms a payment with an operator-issued one-time password
#[async_trait]
pub trait OtpConfirmer: Send + Sync {
    async fn confirm_with_otp(&self, request: &PaymentRequest, otp_code: &str)
        -> AppResult<PaymentResult>;
}
