//! Customer-facing notifications
//!
//! Notices are what a checkout shows after a payment call. A result's provider
//! and whether the backend fell back are deliberately absent from the notice:
//! fallback is invisible to the customer.

use crate::error::{AppError, AppErrorKind};
use crate::payments::types::{PaymentResult, PaymentStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    pub redirect_url: Option<String>,
}

impl PaymentResult {
    pub fn notice(&self) -> Notice {
        let amount = match (self.amount, self.currency) {
            (Some(amount), Some(currency)) => format!("{} {}", amount.normalize(), currency),
            _ => "your payment".to_string(),
        };

        let (level, title, default_message) = match self.status {
            PaymentStatus::Success => (
                NoticeLevel::Success,
                "Payment successful",
                format!("We received {}.", amount),
            ),
            PaymentStatus::Failed => (
                NoticeLevel::Error,
                "Payment failed",
                format!("We could not collect {}. Please try again.", amount),
            ),
            PaymentStatus::Initiated | PaymentStatus::Pending if self.redirect_url.is_some() => (
                NoticeLevel::Info,
                "Complete your payment",
                "You will be redirected to finish the payment.".to_string(),
            ),
            PaymentStatus::Initiated | PaymentStatus::Pending => (
                NoticeLevel::Info,
                "Payment pending",
                format!("Approve the request for {} on your phone.", amount),
            ),
        };

        Notice {
            level,
            title: title.to_string(),
            message: self.message.clone().unwrap_or(default_message),
            redirect_url: self.redirect_url.clone(),
        }
    }
}

impl AppError {
    pub fn notice(&self) -> Notice {
        let title = match &self.kind {
            AppErrorKind::Validation { .. } => "Check your details",
            AppErrorKind::Business { .. } => "Payment not processed",
            AppErrorKind::Network { .. } => "Connection problem",
            AppErrorKind::Configuration { .. } => "Payment unavailable",
        };

        Notice {
            level: NoticeLevel::Error,
            title: title.to_string(),
            message: self.user_message(),
            redirect_url: None,
        }
    }
}
