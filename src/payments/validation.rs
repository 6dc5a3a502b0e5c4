//! Client-side request validation
//!
//! Everything here runs before a request leaves the process. A failed check is a
//! `Validation` error and no network call is made.

use crate::error::{AppError, AppResult};
use crate::payments::types::PaymentRequest;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

lazy_static! {
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{8,15}$").expect("valid phone regex");
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex");
    static ref OTP_RE: Regex = Regex::new(r"^[0-9]{4,6}$").expect("valid otp regex");
}

const MAX_NAME_LEN: usize = 100;

/// Strip the separators customers commonly type into phone numbers
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect()
}

pub fn validate_payment_request(request: &PaymentRequest) -> AppResult<()> {
    if request.amount <= Decimal::ZERO {
        return Err(AppError::validation(
            "amount",
            "Amount must be greater than zero",
        ));
    }

    if request.amount.normalize().scale() > request.currency.minor_units() {
        return Err(AppError::validation(
            "amount",
            format!(
                "{} amounts allow at most {} decimal places",
                request.currency,
                request.currency.minor_units()
            ),
        ));
    }

    if !request.country.accepts(request.currency) {
        return Err(AppError::validation(
            "currency",
            format!(
                "{} is not accepted in {}",
                request.currency,
                request.country.name()
            ),
        ));
    }

    if request.payment_method.country() != request.country {
        return Err(AppError::validation(
            "payment_method",
            format!(
                "{} is not available in {}",
                request.payment_method,
                request.country.name()
            ),
        ));
    }

    validate_phone(&request.phone_number)?;

    let name = request.customer_name.trim();
    if name.is_empty() {
        return Err(AppError::validation("customer_name", "Customer name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(
            "customer_name",
            format!("Customer name must be at most {} characters", MAX_NAME_LEN),
        ));
    }

    if request.customer_email.trim().is_empty() {
        return Err(AppError::validation("customer_email", "Email address is required"));
    }
    if !EMAIL_RE.is_match(request.customer_email.trim()) {
        return Err(AppError::validation("customer_email", "Email address is invalid"));
    }

    if request.reference.trim().is_empty() {
        return Err(AppError::validation("reference", "Payment reference is required"));
    }

    Ok(())
}

pub fn validate_phone(phone: &str) -> AppResult<()> {
    let phone = normalize_phone(phone);
    if phone.is_empty() {
        return Err(AppError::validation("phone_number", "Phone number is required"));
    }
    if !PHONE_RE.is_match(&phone) {
        return Err(AppError::validation("phone_number", "Phone number is invalid"));
    }
    Ok(())
}

pub fn validate_otp(otp: &str) -> AppResult<()> {
    if otp.trim().is_empty() {
        return Err(AppError::validation("otp_code", "Confirmation code is required"));
    }
    if !OTP_RE.is_match(otp.trim()) {
        return Err(AppError::validation(
            "otp_code",
            "Confirmation code must be 4 to 6 digits",
        ));
    }
    Ok(())
}
