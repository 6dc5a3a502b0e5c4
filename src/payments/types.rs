//! Payment request and result types
//!
//! Common types shared by the smart-payment client and the provider passthrough clients.

use crate::payments::registry::{Country, Currency, PaymentMethod, Provider};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Payment request for initiating a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Amount in major currency units
    pub amount: Decimal,
    pub currency: Currency,
    /// Customer's mobile-money number
    pub phone_number: String,
    pub country: Country,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Unique reference for this payment (for idempotency)
    pub reference: String,
}

impl PaymentRequest {
    /// Start a request for `method`, settling in the country's default currency
    pub fn new(method: PaymentMethod, amount: Decimal, phone_number: impl Into<String>) -> Self {
        let country = method.country();
        Self {
            amount,
            currency: country.default_currency(),
            phone_number: phone_number.into(),
            country,
            payment_method: method,
            customer_name: String::new(),
            customer_email: String::new(),
            order_id: None,
            product_id: None,
            reference: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_country(mut self, country: Country) -> Self {
        self.country = country;
        self
    }

    pub fn with_customer(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.customer_name = name.into();
        self.customer_email = email.into();
        self
    }

    pub fn with_order(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }
}

/// Lifecycle state of a payment as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PaymentStatus {
    Initiated,
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    /// Success and failure are final; anything else may still change
    pub fn is_terminal(&self) -> bool {
        matches!(self, PaymentStatus::Success | PaymentStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Initiated => "initiated",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(status: String) -> Self {
        PaymentStatus::from(status.as_str())
    }
}

impl From<&str> for PaymentStatus {
    fn from(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "initiated" | "created" => PaymentStatus::Initiated,
            "success" | "successful" | "completed" => PaymentStatus::Success,
            "failed" | "rejected" | "cancelled" | "canceled" | "expired" => PaymentStatus::Failed,
            _ => PaymentStatus::Pending,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an initiation or status call. Never mutated; each poll yields a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub success: bool,
    pub status: PaymentStatus,
    pub provider: Provider,
    /// Deposit or transaction id used for status polling
    pub payment_id: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,
    /// Whether the backend substituted the fallback provider
    pub fallback_used: bool,
    pub redirect_url: Option<String>,
    pub token: Option<String>,
    pub message: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl PaymentResult {
    /// Query that checks this payment against the provider that accepted it
    pub fn status_query(&self) -> Option<StatusQuery> {
        self.payment_id.as_ref().map(|payment_id| StatusQuery {
            payment_id: payment_id.clone(),
            provider: self.provider,
        })
    }
}

/// Parameters for a single status check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusQuery {
    pub payment_id: String,
    pub provider: Provider,
}

impl StatusQuery {
    pub fn new(payment_id: impl Into<String>, provider: Provider) -> Self {
        Self {
            payment_id: payment_id.into(),
            provider,
        }
    }
}

/// Providers servicing one payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPair {
    pub primary: Provider,
    pub fallback: Option<Provider>,
}

/// Payment method key to provider pair, as reported for one country
pub type MethodAvailability = BTreeMap<String, ProviderPair>;

/// Result of probing the payment backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub base_url: String,
    pub response_time_ms: u64,
    pub last_check: String,
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_normalisation() {
        assert_eq!(PaymentStatus::from("COMPLETED"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from("accepted"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from("REJECTED"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from("created"), PaymentStatus::Initiated);
        assert_eq!(PaymentStatus::from("something-new"), PaymentStatus::Pending);
    }

    #[test]
    fn test_status_deserializes_leniently() {
        let status: PaymentStatus = serde_json::from_str("\"SUCCESSFUL\"").unwrap();
        assert_eq!(status, PaymentStatus::Success);
        assert!(status.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
        assert_eq!(serde_json::to_string(&PaymentStatus::Failed).unwrap(), "\"failed\"");
    }

    #[test]
    fn test_new_request_defaults_from_method() {
        let request = PaymentRequest::new(PaymentMethod::MtnMomoZambia, dec!(15), "260971234567");
        assert_eq!(request.country, Country::Zambia);
        assert_eq!(request.currency, Currency::Zmw);
        assert!(Uuid::parse_str(&request.reference).is_ok());

        let other = PaymentRequest::new(PaymentMethod::MtnMomoZambia, dec!(15), "260971234567");
        assert_ne!(request.reference, other.reference);
    }

    #[test]
    fn test_request_serializes_wire_names() {
        let request = PaymentRequest::new(PaymentMethod::MtnMomoZambia, dec!(15), "260971234567")
            .with_customer("Mwila Banda", "mwila@example.com");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["country"], "ZMB");
        assert_eq!(json["currency"], "ZMW");
        assert_eq!(json["payment_method"], "mtn-momo-zambia");
        assert!(json.get("order_id").is_none());
    }
}
