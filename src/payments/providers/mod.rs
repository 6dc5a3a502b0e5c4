//! Payment client implementations
//!
//! `SmartPaymentClient` talks to the backend aggregation endpoints. The other
//! clients call a single provider's passthrough endpoint directly.

pub mod orange_money_ci;
pub mod paydunya;
pub mod pawapay;
pub mod smart;

pub use orange_money_ci::OrangeMoneyCiClient;
pub use paydunya::PaydunyaClient;
pub use pawapay::PawapayClient;
pub use smart::SmartPaymentClient;

use crate::error::{AppError, AppResult};
use crate::payments::registry::{Currency, Provider};
use crate::payments::types::{PaymentRequest, PaymentResult, PaymentStatus};
use crate::payments::validation::{normalize_phone, validate_payment_request};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::warn;

// Payment payload returned in `data` by the initiation and passthrough endpoints
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PaymentData {
    #[serde(default)]
    status: Option<PaymentStatus>,
    #[serde(default)]
    provider: Option<Provider>,
    #[serde(default, alias = "deposit_id", alias = "transaction_id")]
    payment_id: Option<String>,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_currency")]
    currency: Option<Currency>,
    #[serde(default, deserialize_with = "null_as_false")]
    fallback_used: bool,
    #[serde(default, alias = "payment_url", alias = "checkout_url")]
    redirect_url: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// Echoed currency: any case, and an unsupported code is dropped instead of
// rejecting a payment the backend already accepted
fn lenient_currency<'de, D>(deserializer: D) -> Result<Option<Currency>, D::Error>
where
    D: Deserializer<'de>,
{
    let code = Option::<String>::deserialize(deserializer)?;
    Ok(code.and_then(|code| match code.parse() {
        Ok(currency) => Some(currency),
        Err(e) => {
            warn!("Ignoring echoed currency: {}", e);
            None
        }
    }))
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl PaymentData {
    pub(crate) fn into_result(
        self,
        default_status: PaymentStatus,
        default_provider: Provider,
    ) -> PaymentResult {
        let status = self.status.unwrap_or(default_status);
        PaymentResult {
            success: status != PaymentStatus::Failed,
            status,
            provider: self.provider.unwrap_or(default_provider),
            payment_id: self.payment_id,
            amount: self.amount,
            currency: self.currency,
            fallback_used: self.fallback_used,
            redirect_url: self.redirect_url,
            token: self.token,
            message: self.message,
            observed_at: Utc::now(),
        }
    }
}

/// Validate a request and produce the copy that goes on the wire
pub(crate) fn prepare_request(request: &PaymentRequest) -> AppResult<PaymentRequest> {
    validate_payment_request(request)?;

    let mut wire = request.clone();
    wire.phone_number = normalize_phone(&request.phone_number);
    wire.customer_name = request.customer_name.trim().to_string();
    wire.customer_email = request.customer_email.trim().to_string();
    Ok(wire)
}

/// Provider-specific code for the request's method, or a validation error
pub(crate) fn require_code(request: &PaymentRequest, provider: Provider) -> AppResult<&'static str> {
    request.payment_method.provider_code(provider).ok_or_else(|| {
        AppError::validation(
            "payment_method",
            format!(
                "{} is not supported by {}",
                request.payment_method,
                provider.display_name()
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::http::decode_response;
    use crate::payments::registry::PaymentMethod;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_payment_data_aliases() {
        let data: PaymentData = serde_json::from_value(json!({
            "status": "ACCEPTED",
            "deposit_id": "dep-1",
            "amount": "15.00",
            "currency": "ZMW",
            "checkout_url": "https://pay.example.com/c/1"
        }))
        .unwrap();

        let result = data.into_result(PaymentStatus::Initiated, Provider::Pawapay);
        assert_eq!(result.status, PaymentStatus::Pending);
        assert_eq!(result.provider, Provider::Pawapay);
        assert_eq!(result.payment_id.as_deref(), Some("dep-1"));
        assert_eq!(result.amount, Some(dec!(15)));
        assert_eq!(result.redirect_url.as_deref(), Some("https://pay.example.com/c/1"));
        assert!(result.success);
        assert!(!result.fallback_used);
    }

    #[test]
    fn test_echoed_currency_is_case_insensitive() {
        let data: PaymentData =
            serde_json::from_value(json!({"status": "initiated", "currency": "zmw"})).unwrap();
        let result = data.into_result(PaymentStatus::Initiated, Provider::Pawapay);
        assert_eq!(result.currency, Some(Currency::Zmw));
    }

    #[test]
    fn test_unsupported_echoed_currency_is_dropped() {
        let data: PaymentData = serde_json::from_value(json!({
            "status": "initiated",
            "payment_id": "dep-1",
            "currency": "EUR"
        }))
        .unwrap();
        let result = data.into_result(PaymentStatus::Initiated, Provider::Pawapay);
        assert_eq!(result.currency, None);
        assert_eq!(result.payment_id.as_deref(), Some("dep-1"));
    }

    #[test]
    fn test_null_fallback_used_reads_as_false() {
        let data: PaymentData =
            serde_json::from_value(json!({"status": "initiated", "fallback_used": null})).unwrap();
        let result = data.into_result(PaymentStatus::Initiated, Provider::Moneroo);
        assert!(!result.fallback_used);

        let data: PaymentData = serde_json::from_value(json!({"fallback_used": true})).unwrap();
        assert!(data.fallback_used);
    }

    #[test]
    fn test_lenient_echo_fields_survive_envelope_decoding() {
        let body = json!({
            "success": true,
            "data": {
                "status": "initiated",
                "provider": "Pawapay",
                "payment_id": "dep-1",
                "currency": "zmw",
                "fallback_used": null
            }
        })
        .to_string();

        let data: PaymentData = decode_response(reqwest::StatusCode::OK, &body).unwrap();
        let result = data.into_result(PaymentStatus::Initiated, Provider::Unknown);
        assert_eq!(result.provider, Provider::Pawapay);
        assert_eq!(result.currency, Some(Currency::Zmw));
        assert!(!result.fallback_used);
        assert_eq!(result.status_query().unwrap().provider, Provider::Pawapay);
    }

    #[test]
    fn test_failed_status_is_not_success() {
        let data: PaymentData = serde_json::from_value(json!({"status": "failed"})).unwrap();
        let result = data.into_result(PaymentStatus::Initiated, Provider::Paydunya);
        assert!(!result.success);
    }

    #[test]
    fn test_prepare_request_normalises_phone() {
        let request = PaymentRequest::new(PaymentMethod::MtnMomoZambia, dec!(15), "+260 97-123-4567")
            .with_customer("  Mwila Banda ", "mwila@example.com");
        let wire = prepare_request(&request).unwrap();
        assert_eq!(wire.phone_number, "+260971234567");
        assert_eq!(wire.customer_name, "Mwila Banda");
        assert_eq!(wire.reference, request.reference);
    }

    #[test]
    fn test_require_code() {
        let request = PaymentRequest::new(PaymentMethod::WaveSenegal, dec!(1000), "221771234567");
        assert_eq!(require_code(&request, Provider::Paydunya).unwrap(), "wave-senegal");
        assert!(require_code(&request, Provider::Pawapay).is_err());
    }
}
